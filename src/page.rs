/// The whole UI: sidebar with key entry and mode navigation, one panel per
/// mode, and a tips footer. It talks to `/api/session`, `/api/generate` and
/// `/api/analyze`. An entered key lives in `sessionStorage` only.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Gemini AI Assistant</title>
    <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🤖</text></svg>">
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            display: flex;
        }

        .sidebar {
            width: 280px;
            flex-shrink: 0;
            background: #f8f9ff;
            padding: 30px 20px;
            box-shadow: 4px 0 20px rgba(0,0,0,0.15);
        }

        .sidebar h2 {
            color: #333;
            font-size: 1.2em;
            margin: 20px 0 12px;
        }

        .sidebar label {
            display: block;
            color: #555;
            font-size: 0.9em;
            margin-bottom: 8px;
        }

        .mode-option {
            display: flex;
            align-items: center;
            gap: 8px;
            margin-bottom: 8px;
            cursor: pointer;
        }

        .main {
            flex: 1;
            display: flex;
            justify-content: center;
            padding: 20px;
        }

        .container {
            background: white;
            border-radius: 20px;
            box-shadow: 0 20px 60px rgba(0,0,0,0.3);
            max-width: 1200px;
            width: 100%;
            padding: 40px;
        }

        h1 {
            color: #333;
            margin-bottom: 10px;
            font-size: 2em;
        }

        h3 {
            color: #333;
            margin-bottom: 10px;
        }

        .subtitle {
            color: #666;
            margin-bottom: 30px;
            font-size: 0.95em;
        }

        textarea, input[type="text"], input[type="password"] {
            width: 100%;
            padding: 10px;
            border: 1px solid #ccc;
            border-radius: 8px;
            font-size: 1em;
            font-family: inherit;
            margin-bottom: 15px;
        }

        .upload-box {
            border: 3px dashed #667eea;
            border-radius: 15px;
            padding: 30px 20px;
            text-align: center;
            cursor: pointer;
            background: #f8f9ff;
            margin-bottom: 15px;
            color: #667eea;
            font-weight: 600;
        }

        .upload-box:hover {
            border-color: #764ba2;
            background: #f0f2ff;
        }

        .upload-hint {
            color: #999;
            font-size: 0.85em;
            font-weight: normal;
            margin-top: 6px;
        }

        input[type="file"] {
            display: none;
        }

        button {
            background: #667eea;
            color: white;
            border: none;
            border-radius: 8px;
            padding: 10px 24px;
            font-size: 1em;
            font-weight: 600;
            cursor: pointer;
        }

        button:disabled {
            background: #aab3f0;
            cursor: wait;
        }

        .preview {
            display: none;
            margin-bottom: 20px;
            text-align: center;
        }

        .preview img {
            max-width: 100%;
            border-radius: 10px;
            box-shadow: 0 4px 15px rgba(0,0,0,0.1);
        }

        .caption {
            color: #999;
            font-size: 0.85em;
            margin-top: 6px;
        }

        .loading {
            display: none;
            align-items: center;
            gap: 12px;
            padding: 20px 0;
            color: #667eea;
        }

        .spinner {
            border: 4px solid #f3f3f3;
            border-top: 4px solid #667eea;
            border-radius: 50%;
            width: 28px;
            height: 28px;
            animation: spin 1s linear infinite;
        }

        @keyframes spin {
            0% { transform: rotate(0deg); }
            100% { transform: rotate(360deg); }
        }

        .result {
            display: none;
            background: #f8f9ff;
            border-radius: 10px;
            padding: 20px;
            margin-top: 20px;
            line-height: 1.6;
            color: #333;
        }

        .result-text ul, .result-text ol {
            margin-left: 24px;
        }

        .result-text pre {
            background: #eef0fb;
            padding: 10px;
            border-radius: 6px;
            overflow-x: auto;
        }

        .banner {
            display: none;
            border-radius: 8px;
            padding: 12px 16px;
            margin-top: 15px;
        }

        .banner.info {
            background: #e7f1ff;
            color: #0b4a8b;
        }

        .banner.warning {
            background: #fff8e1;
            color: #8a6d00;
        }

        .banner.error {
            background: #fee;
            color: #c33;
        }

        .tips {
            margin-top: 40px;
            padding-top: 30px;
            border-top: 2px solid #f0f0f0;
            color: #666;
            font-size: 0.9em;
            line-height: 1.8;
        }

        .tips ul {
            margin-left: 20px;
        }
    </style>
</head>
<body>
    <aside class="sidebar">
        <div id="keyEntry" style="display: none">
            <label for="apiKey">Enter your Gemini API key:</label>
            <input type="password" id="apiKey" autocomplete="off">
        </div>

        <h2>Navigation</h2>
        <label>Choose a mode:</label>
        <label class="mode-option"><input type="radio" name="mode" value="text" checked> Text Generation</label>
        <label class="mode-option"><input type="radio" name="mode" value="image"> Image Analysis</label>
    </aside>

    <main class="main">
        <div class="container">
            <h1>🤖 Gemini AI Assistant</h1>
            <p class="subtitle">
                This app demonstrates the capabilities of Google's Gemini AI for both text and image analysis.
                Choose your interaction mode below.
            </p>

            <div class="banner info" id="haltNotice"></div>

            <section id="textMode" style="display: none">
                <h2>💭 Text Generation</h2>
                <p class="subtitle">Enter your prompt below and let Gemini generate text content for you.</p>
                <label for="textPrompt">Enter your prompt:</label>
                <textarea id="textPrompt" rows="4"></textarea>
                <button id="generateBtn">Generate</button>

                <div class="loading" id="textLoading"><div class="spinner"></div><span>Generating response...</span></div>
                <div class="banner" id="textBanner"></div>
                <div class="result" id="textResult">
                    <h3>Response:</h3>
                    <div class="result-text" id="textOutput"></div>
                </div>
            </section>

            <section id="imageMode" style="display: none">
                <h2>🖼️ Image Analysis</h2>
                <p class="subtitle">Upload an image and ask Gemini to analyze it.</p>
                <div class="upload-box" id="uploadBox">
                    Upload an image
                    <div class="upload-hint">PNG, JPG or JPEG</div>
                </div>
                <input type="file" id="fileInput" accept=".png,.jpg,.jpeg,image/png,image/jpeg">

                <div class="preview" id="preview">
                    <img id="previewImage" alt="Uploaded Image">
                    <div class="caption">Uploaded Image</div>
                </div>

                <div id="analysisControls" style="display: none">
                    <label for="imagePrompt">What would you like to know about this image?</label>
                    <input type="text" id="imagePrompt"
                        placeholder="E.g., 'Describe this image in detail' or 'What objects do you see?'">
                    <button id="analyzeBtn">Analyze</button>
                </div>

                <div class="loading" id="imageLoading"><div class="spinner"></div><span>Analyzing image...</span></div>
                <div class="banner" id="imageBanner"></div>
                <div class="result" id="imageResult">
                    <h3>Analysis Results:</h3>
                    <div class="result-text" id="imageOutput"></div>
                </div>
            </section>

            <div class="tips">
                <h3>Tips for best results:</h3>
                <ul>
                    <li>For text generation, be specific and clear in your prompts</li>
                    <li>For image analysis, ensure good image quality and specific questions</li>
                    <li>API responses may vary based on the complexity of your request</li>
                </ul>
            </div>
        </div>
    </main>

    <script>
        const KEY_HEADER = 'x-gemini-api-key';
        const KEY_STORAGE = 'gemini-api-key';
        const HALT_NOTICE = 'Please enter your Gemini API key to continue.';

        const $ = (id) => document.getElementById(id);
        let keyRequired = true;
        let selectedFile = null;

        function enteredKey() {
            return (sessionStorage.getItem(KEY_STORAGE) || '').trim();
        }

        function haltedSession() {
            return keyRequired && !enteredKey();
        }

        function render() {
            const mode = document.querySelector('input[name="mode"]:checked').value;
            const halted = haltedSession();

            $('haltNotice').textContent = HALT_NOTICE;
            $('haltNotice').style.display = halted ? 'block' : 'none';
            $('textMode').style.display = !halted && mode === 'text' ? 'block' : 'none';
            $('imageMode').style.display = !halted && mode === 'image' ? 'block' : 'none';
        }

        function showBanner(id, kind, message) {
            const banner = $(id);
            banner.className = 'banner ' + kind;
            banner.textContent = message;
            banner.style.display = 'block';
        }

        function resetOutput(prefix) {
            $(prefix + 'Banner').style.display = 'none';
            $(prefix + 'Result').style.display = 'none';
        }

        async function submit(prefix, button, request) {
            resetOutput(prefix);
            button.disabled = true;
            $(prefix + 'Loading').style.display = 'flex';

            try {
                const headers = request.headers || {};
                if (keyRequired) {
                    headers[KEY_HEADER] = enteredKey();
                }
                const response = await fetch(request.url, {
                    method: 'POST',
                    headers,
                    body: request.body
                });

                let payload;
                try {
                    payload = await response.json();
                } catch (_) {
                    payload = { error: 'An error occurred: ' + response.statusText, kind: 'error' };
                }

                if (!response.ok) {
                    showBanner(prefix + 'Banner', payload.kind || 'error', payload.error);
                    if (response.status === 401) {
                        sessionStorage.removeItem(KEY_STORAGE);
                        $('apiKey').value = '';
                        render();
                    }
                    return;
                }

                $(prefix + 'Output').innerHTML = payload.html;
                $(prefix + 'Result').style.display = 'block';
            } catch (error) {
                showBanner(prefix + 'Banner', 'error', 'An error occurred: ' + error.message);
            } finally {
                button.disabled = false;
                $(prefix + 'Loading').style.display = 'none';
            }
        }

        $('apiKey').addEventListener('input', (e) => {
            sessionStorage.setItem(KEY_STORAGE, e.target.value);
            render();
        });

        document.querySelectorAll('input[name="mode"]').forEach((radio) => {
            radio.addEventListener('change', render);
        });

        $('generateBtn').addEventListener('click', () => {
            const prompt = $('textPrompt').value;
            if (!prompt) {
                resetOutput('text');
                showBanner('textBanner', 'warning', 'Please enter a prompt first.');
                return;
            }
            submit('text', $('generateBtn'), {
                url: '/api/generate',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ prompt })
            });
        });

        $('uploadBox').addEventListener('click', () => $('fileInput').click());

        $('fileInput').addEventListener('change', (e) => {
            const file = e.target.files[0];
            resetOutput('image');
            $('preview').style.display = 'none';
            $('analysisControls').style.display = 'none';
            selectedFile = null;
            if (!file) {
                return;
            }

            const url = URL.createObjectURL(file);
            const img = $('previewImage');
            img.onload = () => {
                selectedFile = file;
                $('preview').style.display = 'block';
                $('analysisControls').style.display = 'block';
            };
            img.onerror = () => {
                URL.revokeObjectURL(url);
                showBanner('imageBanner', 'error', 'The uploaded file is not a valid PNG or JPEG image.');
            };
            img.src = url;
        });

        $('analyzeBtn').addEventListener('click', () => {
            const prompt = $('imagePrompt').value;
            if (!prompt) {
                resetOutput('image');
                showBanner('imageBanner', 'warning', 'Please enter an analysis prompt first.');
                return;
            }
            if (!selectedFile) {
                return;
            }
            const formData = new FormData();
            formData.append('image', selectedFile);
            formData.append('prompt', prompt);
            submit('image', $('analyzeBtn'), { url: '/api/analyze', body: formData });
        });

        async function init() {
            try {
                const response = await fetch('/api/session');
                const session = await response.json();
                keyRequired = session.key_required;
            } catch (_) {
                keyRequired = true;
            }
            $('keyEntry').style.display = keyRequired ? 'block' : 'none';
            $('apiKey').value = enteredKey();
            render();
        }

        init();
    </script>
</body>
</html>
"##;
