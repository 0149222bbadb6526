/// Single-page chat UI served at `/`. Purely a convenience front end over
/// `POST /chat` and `POST /clear`; the behavioral contract lives in the JSON API.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>HR Assistant</title>
<style>
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { font-family: system-ui, sans-serif; background: #667eea; min-height: 100vh;
         display: flex; justify-content: center; align-items: center; padding: 20px; }
  .container { width: 100%; max-width: 820px; background: #fff; border-radius: 12px;
               display: flex; flex-direction: column; height: 90vh; overflow: hidden; }
  .header { background: #4c51bf; color: #fff; padding: 20px; }
  .header h1 { font-size: 22px; }
  .header p { font-size: 13px; opacity: 0.85; margin-top: 4px; }
  .chat { flex: 1; overflow-y: auto; padding: 20px; background: #f7f8fa; }
  .msg { margin-bottom: 14px; }
  .msg.user { text-align: right; }
  .bubble { display: inline-block; max-width: 75%; padding: 10px 14px; border-radius: 14px;
            word-wrap: break-word; white-space: pre-wrap; text-align: left; }
  .msg.user .bubble { background: #4c51bf; color: #fff; }
  .msg.assistant .bubble { background: #fff; color: #222; box-shadow: 0 1px 4px rgba(0,0,0,0.12); }
  .msg.error .bubble { background: #fde8e8; color: #9b1c1c; }
  .input-row { display: flex; gap: 8px; padding: 14px 20px; border-top: 1px solid #e2e2e2; }
  #message { flex: 1; padding: 10px 14px; border: 1px solid #ccc; border-radius: 18px;
             font-size: 15px; outline: none; }
  button { padding: 10px 20px; border: none; border-radius: 18px; font-size: 14px;
           cursor: pointer; }
  #send { background: #4c51bf; color: #fff; }
  #send:disabled { opacity: 0.5; cursor: default; }
  #clear { background: #eee; color: #555; }
</style>
</head>
<body>
<div class="container">
  <div class="header">
    <h1>HR Assistant</h1>
    <p>Ask about policies, leave balances, employee info, or interview questions.</p>
  </div>
  <div class="chat" id="chat">
    <div class="msg assistant"><div class="bubble">Hello! I'm your HR assistant. How can I help you today?</div></div>
  </div>
  <div class="input-row">
    <input type="text" id="message" placeholder="Type your message..." autofocus>
    <button id="send">Send</button>
    <button id="clear">Clear</button>
  </div>
</div>
<script>
  const chat = document.getElementById('chat');
  const input = document.getElementById('message');
  const sendBtn = document.getElementById('send');
  const clearBtn = document.getElementById('clear');

  function addMessage(kind, text) {
    const msg = document.createElement('div');
    msg.className = 'msg ' + kind;
    const bubble = document.createElement('div');
    bubble.className = 'bubble';
    bubble.textContent = text;
    msg.appendChild(bubble);
    chat.appendChild(msg);
    chat.scrollTop = chat.scrollHeight;
  }

  async function send() {
    const message = input.value.trim();
    if (!message) return;
    addMessage('user', message);
    input.value = '';
    sendBtn.disabled = true;
    try {
      const resp = await fetch('/chat', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ message })
      });
      const data = await resp.json();
      if (resp.ok) {
        addMessage('assistant', data.response);
      } else {
        addMessage('error', data.error || 'request failed');
      }
    } catch (err) {
      addMessage('error', String(err));
    } finally {
      sendBtn.disabled = false;
      input.focus();
    }
  }

  sendBtn.addEventListener('click', send);
  input.addEventListener('keypress', (e) => {
    if (e.key === 'Enter') { e.preventDefault(); send(); }
  });
  clearBtn.addEventListener('click', async () => {
    await fetch('/clear', { method: 'POST' });
    chat.innerHTML = '';
    addMessage('assistant', "Conversation cleared. How can I help you?");
  });
</script>
</body>
</html>
"##;
