pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>AI IT Helpdesk Agent</title>
<style>
  body { font-family: sans-serif; margin: 0; display: flex; height: 100vh; }
  main { flex: 3; display: flex; flex-direction: column; padding: 1rem; }
  aside { flex: 1; border-left: 1px solid #ddd; padding: 1rem; overflow-y: auto; background: #fafafa; }
  #log { flex: 1; overflow-y: auto; border: 1px solid #ddd; padding: 0.5rem; }
  .msg { white-space: pre-wrap; margin: 0.5rem 0; }
  .user { color: #1a5; }
  .agent { color: #225; }
  form { display: flex; gap: 0.5rem; margin-top: 0.5rem; }
  input { flex: 1; padding: 0.5rem; }
  pre { white-space: pre-wrap; }
</style>
</head>
<body>
<main>
  <h2>AI IT Helpdesk Agent</h2>
  <p>Ask a question about IT policies, describe an issue to create a ticket, or use
  <code>status &lt;id&gt;</code> / <code>close &lt;id&gt; &lt;resolution&gt;</code>.</p>
  <div id="log"></div>
  <form id="chat">
    <input id="message" autocomplete="off" placeholder="Type your message...">
    <button type="submit">Send</button>
    <button type="button" id="clear">Clear</button>
  </form>
</main>
<aside>
  <h3>Tickets</h3>
  <pre id="tickets">No tickets created yet.</pre>
</aside>
<script>
  const log = document.getElementById('log');
  const tickets = document.getElementById('tickets');

  function append(text, cls) {
    const div = document.createElement('div');
    div.className = 'msg ' + cls;
    div.textContent = text;
    log.appendChild(div);
    log.scrollTop = log.scrollHeight;
  }

  async function post(url, body) {
    const res = await fetch(url, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: body ? JSON.stringify(body) : '{}'
    });
    return res.json();
  }

  document.getElementById('chat').addEventListener('submit', async (e) => {
    e.preventDefault();
    const input = document.getElementById('message');
    const message = input.value.trim();
    if (!message) return;
    input.value = '';
    append('You: ' + message, 'user');
    const data = await post('/api/chat', { message });
    if (data.response) append('Agent: ' + data.response, 'agent');
    tickets.textContent = data.tickets;
  });

  document.getElementById('clear').addEventListener('click', async () => {
    const data = await post('/api/clear');
    log.innerHTML = '';
    append(data.response, 'agent');
    tickets.textContent = data.tickets;
  });

  fetch('/api/tickets').then(r => r.json()).then(d => { tickets.textContent = d.tickets; });
</script>
</body>
</html>
"#;
