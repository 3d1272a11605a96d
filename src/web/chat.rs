//! Chat widget DOM wiring
//!
//! Questions come from the form or the quick-action buttons; replies come
//! from the scripted responder or Gemini via `fetch`.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Request, RequestInit, Response, Window};

use super::describe_js;
use super::markdown::MarkedRenderer;
use super::Listener;
use crate::core::chat::{normalize_prompt, ChatBackend, ChatError, ChatRole, ChatState};
use crate::core::config::ChatConfig;
use crate::core::gemini::{parse_reply, GeminiClient};
use crate::core::markup::{render_or_plain, MarkupRenderer};

const CLOSED_CLASSES: [&str; 3] = ["hidden", "scale-95", "opacity-0"];
const OPEN_CLASSES: [&str; 2] = ["scale-100", "opacity-100"];

const TYPING_INDICATOR_HTML: &str = r#"<div class="typing-dot"></div><div class="typing-dot" style="animation-delay:0.1s"></div><div class="typing-dot" style="animation-delay:0.2s"></div>"#;

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{} not found", id)))
}

struct ChatInner {
    window: Window,
    document: Document,
    toggle_button: Element,
    chat_window: Element,
    input: HtmlInputElement,
    messages: Element,
    state: RefCell<ChatState>,
    backend: ChatBackend,
    markup: Option<MarkedRenderer>,
}

impl ChatInner {
    fn toggle(&self) {
        let open = self.state.borrow_mut().toggle();
        let window_classes = self.chat_window.class_list();
        let result = if open {
            window_classes
                .remove_3(CLOSED_CLASSES[0], CLOSED_CLASSES[1], CLOSED_CLASSES[2])
                .and_then(|_| window_classes.add_2(OPEN_CLASSES[0], OPEN_CLASSES[1]))
                .and_then(|_| self.toggle_button.class_list().add_1("hidden"))
        } else {
            window_classes
                .add_3(CLOSED_CLASSES[0], CLOSED_CLASSES[1], CLOSED_CLASSES[2])
                .and_then(|_| window_classes.remove_2(OPEN_CLASSES[0], OPEN_CLASSES[1]))
                .and_then(|_| self.toggle_button.class_list().remove_1("hidden"))
        };
        if let Err(e) = result {
            error!(error = %describe_js(&e), "Cannot toggle chat window");
        }
        debug!(open, "Chat toggled");
    }

    fn scroll_to_bottom(&self) {
        self.messages.set_scroll_top(self.messages.scroll_height());
    }

    /// User text is inserted verbatim; assistant text goes through the markup renderer
    fn append(&self, role: ChatRole, text: &str) {
        let div = match self.document.create_element("div") {
            Ok(div) => div,
            Err(e) => {
                error!(error = %describe_js(&e), "Cannot create chat message");
                return;
            }
        };
        match role {
            ChatRole::User => {
                div.set_class_name("chat-message chat-user");
                div.set_text_content(Some(text));
            }
            ChatRole::Assistant => {
                div.set_class_name("chat-message chat-ai");
                let html = render_or_plain(
                    self.markup.as_ref().map(|m| m as &dyn MarkupRenderer),
                    text,
                );
                div.set_inner_html(&html);
            }
        }
        if let Err(e) = self.messages.append_child(&div) {
            error!(error = %describe_js(&e), "Cannot append chat message");
            return;
        }
        self.state.borrow_mut().push(role, text);
        self.scroll_to_bottom();
    }

    fn show_typing(&self) -> Option<Element> {
        let div = self.document.create_element("div").ok()?;
        div.set_class_name("chat-message chat-ai flex gap-1 items-center");
        div.set_id("typing-indicator");
        div.set_inner_html(TYPING_INDICATOR_HTML);
        self.messages.append_child(&div).ok()?;
        self.scroll_to_bottom();
        Some(div)
    }

    /// Record the question and answer it asynchronously
    fn submit(self: &Rc<Self>, raw: &str) {
        let Some(prompt) = normalize_prompt(raw) else {
            return;
        };
        self.append(ChatRole::User, &prompt);

        let inner = self.clone();
        spawn_local(async move {
            let typing = inner.show_typing();
            let reply = inner.answer(&prompt).await;
            if let Some(typing) = typing {
                typing.remove();
            }
            inner.append(ChatRole::Assistant, &reply);
        });
    }

    async fn answer(&self, prompt: &str) -> String {
        match &self.backend {
            ChatBackend::Scripted {
                responder,
                typing_delay_ms,
            } => {
                if let Err(e) = sleep_ms(&self.window, *typing_delay_ms).await {
                    debug!(error = %describe_js(&e), "Typing delay interrupted");
                }
                responder.reply(prompt)
            }
            ChatBackend::Remote(client) => match fetch_reply(&self.window, client, prompt).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(error = %e, "Gemini request failed");
                    e.user_message().to_string()
                }
            },
        }
    }
}

/// Resolve after `ms` milliseconds
async fn sleep_ms(window: &Window, ms: u32) -> Result<(), JsValue> {
    let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
    let mut scheduled = Ok(0);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
    });
    scheduled?;
    JsFuture::from(promise).await.map(|_| ())
}

fn transport_error(e: JsValue) -> ChatError {
    ChatError::Transport(describe_js(&e))
}

/// POST the prompt and extract the reply text
async fn fetch_reply(window: &Window, client: &GeminiClient, prompt: &str) -> Result<String, ChatError> {
    let body = client.request_body(prompt)?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(&client.url(), &init).map_err(transport_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(transport_error)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport_error)?
        .dyn_into()
        .map_err(transport_error)?;
    let status = response.status();

    let text = JsFuture::from(response.text().map_err(transport_error)?)
        .await
        .map_err(transport_error)?
        .as_string()
        .ok_or_else(|| ChatError::Transport("response body is not text".to_string()))?;
    debug!(status, bytes = text.len(), model = client.model(), "Gemini responded");

    parse_reply(&text)
}

/// Mounted widget; listeners are detached when dropped
pub struct ChatWidget {
    _inner: Rc<ChatInner>,
    _listeners: Vec<Listener>,
}

impl ChatWidget {
    pub fn mount(window: &Window, document: &Document, config: &ChatConfig) -> Result<Self, JsValue> {
        let ids = &config.elements;
        let toggle_button = element(document, &ids.toggle_button)?;
        let chat_window = element(document, &ids.window)?;
        let close_button = element(document, &ids.close_button)?;
        let form = element(document, &ids.form)?;
        let input: HtmlInputElement = element(document, &ids.input)?
            .dyn_into()
            .map_err(|_| JsValue::from_str("chat input is not an <input>"))?;
        let messages = element(document, &ids.messages)?;

        let backend = ChatBackend::from_config(config);
        let markup = MarkedRenderer::detect(window);
        info!(
            remote = backend.is_remote(),
            markdown = markup.is_some(),
            "Chat widget mounted"
        );

        let inner = Rc::new(ChatInner {
            window: window.clone(),
            document: document.clone(),
            toggle_button: toggle_button.clone(),
            chat_window,
            input,
            messages,
            state: RefCell::new(ChatState::new()),
            backend,
            markup,
        });

        let mut listeners = Vec::new();

        for button in [&toggle_button, &close_button] {
            let inner = inner.clone();
            listeners.push(Listener::new(button.as_ref(), "click", move |_| inner.toggle())?);
        }

        {
            let inner = inner.clone();
            listeners.push(Listener::new(form.as_ref(), "submit", move |e| {
                e.prevent_default();
                let text = inner.input.value();
                if normalize_prompt(&text).is_none() {
                    return;
                }
                inner.input.set_value("");
                inner.submit(&text);
            })?);
        }

        let quick_actions = document.query_selector_all(&ids.quick_actions)?;
        for i in 0..quick_actions.length() {
            let Some(button) = quick_actions
                .item(i)
                .and_then(|n| n.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            let inner = inner.clone();
            let label = button.clone();
            listeners.push(Listener::new(button.as_ref(), "click", move |_| {
                inner.submit(&label.inner_text());
            })?);
        }

        Ok(Self {
            _inner: inner,
            _listeners: listeners,
        })
    }
}
