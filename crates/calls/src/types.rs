//! Value types exchanged through a call.
//!
//! [`Request`] and [`Response`] describe one HTTP exchange as seen by a call;
//! [`ReturnType`] describes the declared return type that adapter factories
//! match against.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CallError;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    /// Returns the method name as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = CallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(CallError::invalid_argument(format!(
                "unsupported HTTP method '{s}'"
            ))),
        }
    }
}

/// The request a call sends. Immutable once attached to a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Creates a request without headers or body.
    ///
    /// Returns `None` if `url` is empty.
    pub fn new(method: Method, url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        if url.is_empty() {
            return None;
        }
        Some(Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        })
    }

    /// Shorthand for a `GET` request.
    pub fn get(url: impl Into<String>) -> Option<Self> {
        Self::new(Method::Get, url)
    }

    /// Appends a header. Repeated names are kept in insertion order.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// The response a call produced.
///
/// Any status code is a response; only transport failures are errors. The
/// body is delivered exactly as the inner call produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    status: u16,
    headers: Vec<(String, String)>,
    body: Option<T>,
}

impl<T> Response<T> {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Option<T>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` for a 2xx status.
    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the first header value with the given name (ASCII case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }
}

// ---------------------------------------------------------------------------
// Declared return types
// ---------------------------------------------------------------------------

/// Descriptor of a declared return type such as `EventCall<User>`.
///
/// Parsed into the raw type name and its type parameters. Nested generics are
/// kept whole: `EventCall<List<User>>` has the single parameter `List<User>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnType {
    raw: String,
    parameters: Vec<String>,
}

impl ReturnType {
    /// Parses a return-type signature.
    pub fn parse(signature: &str) -> Result<Self, CallError> {
        let signature = signature.trim();
        let invalid = |reason: &str| CallError::InvalidReturnType {
            return_type: signature.to_string(),
            reason: reason.to_string(),
        };

        let (raw, parameters) = match signature.find('<') {
            None => (signature, Vec::new()),
            Some(open) => {
                let inner = signature[open + 1..]
                    .strip_suffix('>')
                    .ok_or_else(|| invalid("missing closing '>'"))?;
                let parameters = split_parameters(inner).ok_or_else(|| invalid("unbalanced '<' '>'"))?;
                if parameters.is_empty() {
                    return Err(invalid("empty type parameter list"));
                }
                (signature[..open].trim_end(), parameters)
            }
        };

        let well_formed = !raw.is_empty()
            && raw
                .split("::")
                .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_alphanumeric() || c == '_'));
        if !well_formed {
            return Err(invalid("raw type is not a type path"));
        }

        Ok(Self {
            raw: raw.to_string(),
            parameters,
        })
    }

    /// Returns the raw type as written, including any path prefix.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the last path segment of the raw type (`a::b::EventCall` → `EventCall`).
    pub fn simple_name(&self) -> &str {
        self.raw.rsplit("::").next().unwrap_or(&self.raw)
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Returns the response type carried by a call type: its first type parameter.
    ///
    /// Fails for an unparameterized type, because a bare `EventCall` says
    /// nothing about what its responses contain.
    pub fn response_type(&self) -> Result<&str, CallError> {
        self.parameters
            .first()
            .map(String::as_str)
            .ok_or_else(|| CallError::InvalidReturnType {
                return_type: self.to_string(),
                reason: format!("{} must be parameterized as {}<ResponseType>", self.raw, self.raw),
            })
    }
}

impl FromStr for ReturnType {
    type Err = CallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ReturnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.parameters.is_empty() {
            f.write_str(&self.raw)
        } else {
            write!(f, "{}<{}>", self.raw, self.parameters.join(", "))
        }
    }
}

/// Splits a type parameter list on top-level commas.
///
/// Returns `None` if angle brackets are unbalanced or a parameter is empty.
fn split_parameters(list: &str) -> Option<Vec<String>> {
    let mut parameters = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parameters.push(non_empty(&list[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    if !list.trim().is_empty() || !parameters.is_empty() {
        parameters.push(non_empty(&list[start..])?);
    }
    Some(parameters)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
