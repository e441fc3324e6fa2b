// WebDriver session adapter
//
// Speaks the W3C WebDriver JSON protocol to a running driver such as chromedriver.
// Every command answers `{"value": ...}`; failures carry
// `{"value": {"error": "...", "message": "..."}}` with a non-2xx status.

use std::time::Duration;

use async_trait::async_trait;
use rebootr_common::session::{Element, Locator, Session, SessionError};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, trace};
use url::Url;

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Upper bound the driver applies to a single page load.
    pub page_load_timeout: Duration,
    /// Timeout of one HTTP round trip to the driver.
    pub command_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            page_load_timeout: Duration::from_secs(30),
            command_timeout: Duration::from_secs(60),
        }
    }
}

impl BrowserOptions {
    fn chrome_args(&self) -> Vec<&'static str> {
        let mut args = vec!["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"];
        if self.headless {
            args.insert(0, "--headless=new");
        }
        args
    }

    fn capabilities(&self) -> Value {
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": self.chrome_args() },
                    "timeouts": {
                        "pageLoad": u64::try_from(self.page_load_timeout.as_millis()).unwrap_or(u64::MAX)
                    }
                }
            }
        })
    }
}

#[derive(Deserialize)]
struct Envelope {
    value: Value,
}

#[derive(Deserialize)]
struct DriverError {
    error: String,
    #[serde(default)]
    message: String,
}

/// One browser, driven through a WebDriver server.
pub struct WebDriverSession {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl WebDriverSession {
    /// Starts a new browser session on the driver at `driver_url`.
    pub async fn connect(driver_url: &Url, options: &BrowserOptions) -> Result<Self, SessionError> {
        let http = reqwest::Client::builder()
            .timeout(options.command_timeout)
            .build()
            .map_err(transport)?;
        let base_url = driver_url.as_str().trim_end_matches('/').to_string();

        let value = send(&http, Method::POST, &format!("{base_url}/session"), Some(options.capabilities())).await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| SessionError::Protocol("new session response without sessionId".into()))?
            .to_string();

        debug!(%session_id, driver = %base_url, "browser session started");
        Ok(Self {
            http,
            base_url,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Ends the session and closes the browser.
    pub async fn close(self) -> Result<(), SessionError> {
        let url = format!("{}/session/{}", self.base_url, self.session_id);
        send(&self.http, Method::DELETE, &url, None).await?;
        debug!(session_id = %self.session_id, "browser session closed");
        Ok(())
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, SessionError> {
        let url = format!("{}/session/{}/{path}", self.base_url, self.session_id);
        send(&self.http, method, &url, body).await
    }

    async fn element_command(
        &self,
        method: Method,
        element: &Element,
        suffix: &str,
        body: Option<Value>,
    ) -> Result<Value, SessionError> {
        self.command(method, &format!("element/{}/{suffix}", element.id()), body)
            .await
    }

    async fn locate(&self, path: &str, locator: &Locator) -> Result<Element, SessionError> {
        let (using, value) = strategy(locator);
        let found = self
            .command(Method::POST, path, Some(json!({ "using": using, "value": value })))
            .await
            .map_err(|err| match err {
                SessionError::WebDriver { ref error, .. } if error == "no such element" => {
                    SessionError::ElementNotFound(locator.clone())
                }
                other => other,
            })?;
        element_from(&found)
    }
}

#[async_trait]
impl Session for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        Url::parse(url).map_err(|err| SessionError::InvalidUrl(format!("{url}: {err}")))?;
        self.command(Method::POST, "url", Some(json!({ "url": url })))
            .await
            .map(drop)
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        let value = self.command(Method::GET, "source", None).await?;
        as_string(value)
    }

    async fn title(&mut self) -> Result<String, SessionError> {
        let value = self.command(Method::GET, "title", None).await?;
        as_string(value)
    }

    async fn find(&mut self, locator: &Locator) -> Result<Element, SessionError> {
        self.locate("element", locator).await
    }

    async fn find_within(&mut self, parent: &Element, locator: &Locator) -> Result<Element, SessionError> {
        self.locate(&format!("element/{}/element", parent.id()), locator)
            .await
    }

    async fn click(&mut self, element: &Element) -> Result<(), SessionError> {
        self.element_command(Method::POST, element, "click", Some(json!({})))
            .await
            .map(drop)
    }

    async fn clear(&mut self, element: &Element) -> Result<(), SessionError> {
        self.element_command(Method::POST, element, "clear", Some(json!({})))
            .await
            .map(drop)
    }

    async fn type_text(&mut self, element: &Element, text: &str) -> Result<(), SessionError> {
        self.element_command(Method::POST, element, "value", Some(json!({ "text": text })))
            .await
            .map(drop)
    }

    async fn text(&mut self, element: &Element) -> Result<String, SessionError> {
        let value = self.element_command(Method::GET, element, "text", None).await?;
        as_string(value)
    }

    async fn css_value(&mut self, element: &Element, property: &str) -> Result<String, SessionError> {
        let value = self
            .element_command(Method::GET, element, &format!("css/{property}"), None)
            .await?;
        as_string(value)
    }

    async fn is_clickable(&mut self, element: &Element) -> Result<bool, SessionError> {
        let displayed = self.element_command(Method::GET, element, "displayed", None).await?;
        if displayed.as_bool() != Some(true) {
            return Ok(false);
        }
        let enabled = self.element_command(Method::GET, element, "enabled", None).await?;
        Ok(enabled.as_bool() == Some(true))
    }

    async fn hover(&mut self, element: &Element) -> Result<(), SessionError> {
        let actions = json!({
            "actions": [{
                "type": "pointer",
                "id": "mouse",
                "parameters": { "pointerType": "mouse" },
                "actions": [{
                    "type": "pointerMove",
                    "duration": 100,
                    "origin": { ELEMENT_KEY: element.id() },
                    "x": 0,
                    "y": 0
                }]
            }]
        });
        self.command(Method::POST, "actions", Some(actions))
            .await
            .map(drop)
    }
}

async fn send(
    http: &reqwest::Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<Value, SessionError> {
    trace!(%method, url, "webdriver command");
    let mut request = http.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    let text = response.text().await.map_err(transport)?;

    let envelope: Envelope = serde_json::from_str(&text)
        .map_err(|err| SessionError::Protocol(format!("HTTP {status}: {err}")))?;

    if status.is_success() {
        return Ok(envelope.value);
    }
    match serde_json::from_value::<DriverError>(envelope.value) {
        Ok(driver_error) => Err(SessionError::WebDriver {
            error: driver_error.error,
            message: driver_error.message,
        }),
        Err(_) => Err(SessionError::Protocol(format!("HTTP {status} without error payload"))),
    }
}

/// W3C only knows CSS, link text, tag name and XPath; `name` and `id` become CSS.
fn strategy(locator: &Locator) -> (&'static str, String) {
    match locator {
        Locator::Css(selector) => ("css selector", selector.clone()),
        Locator::Name(name) => ("css selector", format!("[name=\"{name}\"]")),
        Locator::Id(id) => ("css selector", format!("[id=\"{id}\"]")),
        Locator::Tag(tag) => ("tag name", tag.clone()),
    }
}

fn element_from(value: &Value) -> Result<Element, SessionError> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(Element::new)
        .ok_or_else(|| SessionError::Protocol(format!("not an element reference: {value}")))
}

fn as_string(value: Value) -> Result<String, SessionError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(SessionError::Protocol(format!("expected a string, got {other}"))),
    }
}

fn transport(err: reqwest::Error) -> SessionError {
    SessionError::Transport(err.to_string())
}
