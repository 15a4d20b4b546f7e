use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{Auth, DocumentItems, Documents, UserDataApi};
use crate::error::{ClientError, api_error};
use crate::session::Session;
use crate::types::TokenResponse;

/// One replayable request.
pub(crate) struct Call {
    pub method: Method,
    pub url: Url,
    pub body: Option<serde_json::Value>,
}

impl Call {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    pub fn json(mut self, body: &impl Serialize) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url).map_err(|e| ClientError::Url(e.to_string()))?;
        // `Url::join` drops the last segment unless the base ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn documents(&self) -> Documents<'_> {
        Documents { client: self }
    }

    pub fn document_items(&self) -> DocumentItems<'_> {
        DocumentItems { client: self }
    }

    pub fn user_data(&self) -> UserDataApi<'_> {
        UserDataApi { client: self }
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Url(e.to_string()))
    }

    async fn execute(&self, call: &Call, token: Option<&str>) -> Result<Response, ClientError> {
        let mut req = self.http.request(call.method.clone(), call.url.clone());
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &call.body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    /// Send without credentials.
    pub(crate) async fn send_anonymous(&self, call: Call) -> Result<Response, ClientError> {
        self.execute(&call, None).await
    }

    /// Send with the session's access token, refreshing once on 401.
    pub(crate) async fn send(
        &self,
        session: &mut Session,
        call: Call,
    ) -> Result<Response, ClientError> {
        let token = session
            .access_token
            .clone()
            .ok_or(ClientError::NotAuthenticated)?;
        let response = self.execute(&call, Some(&token)).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(url = %call.url, "access token rejected, refreshing");
        if let Err(e) = self.refresh(session).await {
            tracing::info!(error = %e, "refresh failed, signing out");
            session.clear();
            return Err(ClientError::SessionExpired);
        }

        let token = session
            .access_token
            .clone()
            .ok_or(ClientError::SessionExpired)?;
        let response = self.execute(&call, Some(&token)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!(url = %call.url, "replay rejected, signing out");
            session.clear();
            return Err(ClientError::SessionExpired);
        }
        Ok(response)
    }

    /// Exchange the session's refresh token for a new pair.
    pub async fn refresh(&self, session: &mut Session) -> Result<(), ClientError> {
        let refresh_token = session
            .refresh_token
            .clone()
            .ok_or(ClientError::NotAuthenticated)?;
        let call = Call::new(Method::POST, self.url("refresh")?).json(&RefreshBody {
            refresh_token: &refresh_token,
        })?;
        let tokens: TokenResponse = json(self.send_anonymous(call).await?).await?;
        session.store(tokens);
        Ok(())
    }
}

/// Decode a success body, or the API error.
pub(crate) async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json().await?)
}

/// Expect a success status with no interesting body.
pub(crate) async fn empty(response: Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(())
}
