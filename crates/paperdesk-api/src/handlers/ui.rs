//! `GET /`: the question page.
//!
//! Banners from the last provisioning run are rendered server-side; the
//! answer is fetched from `/api/v1/ask` (batch) or `/api/v1/ask/stream`
//! (stream) by the inline script.

use axum::{extract::State, response::Html};

use crate::state::{AppState, StatusSnapshot};

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Paper Assistant</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; }
.banner { padding: .5rem .75rem; margin: .25rem 0; border-radius: 4px; }
.info { background: #e8f0fe; } .success { background: #e6f4ea; }
.warning { background: #fef7e0; } .error { background: #fce8e6; }
form { display: flex; gap: .5rem; margin: 1.5rem 0; }
input { flex: 1; padding: .5rem; }
#answer { white-space: pre-wrap; line-height: 1.5; }
</style>
</head>
<body>
<h1>Paper Assistant</h1>
<div id="banners">{{BANNERS}}</div>
<form id="ask-form" data-mode="{{MODE}}">
<label for="question">Ask</label>
<input id="question" name="question" type="text" autocomplete="off" {{DISABLED}}>
<button type="submit" {{DISABLED}}>Send</button>
</form>
<div id="warning" class="banner warning" hidden></div>
<div id="answer"></div>
<script>
const form = document.getElementById("ask-form");
const answer = document.getElementById("answer");
const warning = document.getElementById("warning");

function showWarning(text) {
  warning.textContent = text;
  warning.hidden = false;
}

form.addEventListener("submit", async (ev) => {
  ev.preventDefault();
  const question = document.getElementById("question").value.trim();
  if (!question) return;
  answer.textContent = "";
  warning.hidden = true;

  if (form.dataset.mode === "stream") {
    const source = new EventSource("/api/v1/ask/stream?question=" + encodeURIComponent(question));
    source.addEventListener("chunk", (e) => { answer.textContent += e.data; });
    source.addEventListener("warning", (e) => { showWarning(e.data); source.close(); });
    source.addEventListener("failure", (e) => { showWarning(e.data); source.close(); });
    source.addEventListener("done", () => source.close());
    source.onerror = () => {
      source.close();
      showWarning("Connection to the server was lost. Please ask again.");
    };
    return;
  }

  const resp = await fetch("/api/v1/ask", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ question }),
  });
  const body = await resp.json();
  if (!resp.ok) { showWarning(body.error); return; }
  if (body.warning) showWarning(body.warning);
  answer.textContent = body.answer;
});
</script>
</body>
</html>
"#;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.snapshot().await))
}

fn render_page(snapshot: &StatusSnapshot) -> String {
    let banners: String = snapshot
        .banners
        .iter()
        .map(|b| {
            format!(
                r#"<div class="banner {}">{}</div>"#,
                b.level,
                escape_html(&b.message)
            )
        })
        .collect();

    PAGE_TEMPLATE
        .replace("{{BANNERS}}", &banners)
        .replace("{{MODE}}", &snapshot.output_mode)
        .replace("{{DISABLED}}", if snapshot.ready { "" } else { "disabled" })
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
