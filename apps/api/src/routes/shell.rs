use axum::response::Html;

/// GET /
/// Single-page transcript: input box, Send and Reload buttons.
pub async fn transcript_page() -> Html<&'static str> {
    Html(TRANSCRIPT_PAGE)
}

const TRANSCRIPT_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Professional Persona Chat</title>
<style>
  body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }
  #chat { border: 1px solid #ccc; height: 28rem; overflow-y: auto; padding: .5rem; white-space: pre-wrap; }
  form { display: flex; gap: .5rem; margin-top: .5rem; }
  #message { flex: 1; }
</style>
</head>
<body>
<div id="chat"></div>
<form id="send-form">
  <input id="message" autocomplete="off" autofocus>
  <button type="submit">Send</button>
  <button type="button" id="reload">Reload Resume</button>
</form>
<script>
const chat = document.getElementById("chat");
const input = document.getElementById("message");
// Requests run one after another so replies land in the order they were sent.
let queue = Promise.resolve();

function enqueue(task) {
  queue = queue.then(task, task);
  return queue;
}

function append(speaker, text) {
  const line = document.createElement("div");
  line.textContent = speaker + ": " + text;
  chat.appendChild(line);
  chat.scrollTop = chat.scrollHeight;
}

async function post(url, body) {
  const res = await fetch(url, {
    method: "POST",
    headers: { "content-type": "application/json" },
    body: body === undefined ? undefined : JSON.stringify(body),
  });
  const data = await res.json().catch(() => ({}));
  if (!res.ok) throw new Error((data.error && data.error.message) || res.statusText);
  return data;
}

document.getElementById("send-form").addEventListener("submit", (event) => {
  event.preventDefault();
  const message = input.value.trim();
  if (!message) return;
  input.value = "";
  append("You", message);
  enqueue(async () => {
    try {
      const data = await post("/api/v1/chat", { message });
      append("Agent", data.reply);
    } catch (err) {
      append("System", err.message);
    }
  });
});

document.getElementById("reload").addEventListener("click", () => {
  enqueue(async () => {
    try {
      await post("/api/v1/resume/reload");
      append("System", "Resume reloaded. You can start chatting.");
    } catch (err) {
      alert(err.message);
    }
  });
});

fetch("/api/v1/session").then((res) => res.json()).then((s) => {
  append("System", s.resume_loaded
    ? "Resume loaded from " + s.source + ". You can start chatting."
    : "No resume loaded. Use Reload Resume once it is in place.");
});
</script>
</body>
</html>
"#;
