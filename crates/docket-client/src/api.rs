//! Endpoint wrappers grouped the way the API groups its routes.

use reqwest::Method;

use crate::client::{ApiClient, Call, empty, json};
use crate::error::ClientError;
use crate::session::Session;
use crate::types::{
    Credentials, DeleteAllResult, Document, DocumentCreated, DocumentInput, DocumentItem,
    DocumentListQuery, ItemInput, Page, ProductSummary, TokenResponse, UserData, UserDataInput,
};

// ── Auth ─────────────────────────────────────────────────────────────────────

pub struct Auth<'a> {
    pub(crate) client: &'a ApiClient,
}

impl Auth<'_> {
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let call = Call::new(Method::POST, self.client.url("register")?).json(credentials)?;
        empty(self.client.send_anonymous(call).await?).await
    }

    /// Sign in and return a fresh session.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let call = Call::new(Method::POST, self.client.url("login")?).json(credentials)?;
        let tokens: TokenResponse = json(self.client.send_anonymous(call).await?).await?;
        let mut session = Session::default();
        session.store(tokens);
        Ok(session)
    }

    /// Sign out server-side, then clear the session whatever the outcome.
    pub async fn logout(&self, session: &mut Session) -> Result<(), ClientError> {
        let call = Call::new(Method::POST, self.client.url("logout")?);
        let result = match self.client.send(session, call).await {
            Ok(response) => empty(response).await,
            Err(e) => Err(e),
        };
        session.clear();
        result
    }
}

// ── Documents ────────────────────────────────────────────────────────────────

pub struct Documents<'a> {
    pub(crate) client: &'a ApiClient,
}

impl Documents<'_> {
    pub async fn list(
        &self,
        session: &mut Session,
        query: &DocumentListQuery,
    ) -> Result<Page<Document>, ClientError> {
        let mut url = self.client.url("documents/getDocuments")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(page_index) = query.page_index {
                pairs.append_pair("pageIndex", &page_index.to_string());
            }
            if let Some(page_size) = query.page_size {
                pairs.append_pair("pageSize", &page_size.to_string());
            }
            if let Some(search) = query.search.as_deref() {
                pairs.append_pair("search", search);
            }
            if let Some(sort_by) = query.sort_by.as_deref() {
                pairs.append_pair("sortBy", sort_by);
            }
            if query.sort_descending {
                pairs.append_pair("sortDescending", "true");
            }
        }
        json(self.client.send(session, Call::new(Method::GET, url)).await?).await
    }

    pub async fn get(
        &self,
        session: &mut Session,
        id: i32,
        include_items: bool,
    ) -> Result<Document, ClientError> {
        let mut url = self.client.url(&format!("documents/getDocument/{id}"))?;
        url.query_pairs_mut()
            .append_pair("includeItems", &include_items.to_string());
        json(self.client.send(session, Call::new(Method::GET, url)).await?).await
    }

    pub async fn add(
        &self,
        session: &mut Session,
        document: &DocumentInput,
    ) -> Result<DocumentCreated, ClientError> {
        let call =
            Call::new(Method::POST, self.client.url("documents/addDocument")?).json(document)?;
        json(self.client.send(session, call).await?).await
    }

    pub async fn update(
        &self,
        session: &mut Session,
        id: i32,
        document: &DocumentInput,
    ) -> Result<(), ClientError> {
        let url = self.client.url(&format!("documents/updateDocument/{id}"))?;
        let call = Call::new(Method::PUT, url).json(document)?;
        empty(self.client.send(session, call).await?).await
    }

    pub async fn delete(&self, session: &mut Session, id: i32) -> Result<(), ClientError> {
        let url = self.client.url(&format!("documents/deleteDocument/{id}"))?;
        empty(self.client.send(session, Call::new(Method::DELETE, url)).await?).await
    }

    /// Remove every document. Sends the required confirmation token.
    pub async fn delete_all(&self, session: &mut Session) -> Result<DeleteAllResult, ClientError> {
        let mut url = self.client.url("documents/deleteAll")?;
        url.query_pairs_mut().append_pair("confirmation", "CONFIRM");
        json(self.client.send(session, Call::new(Method::DELETE, url)).await?).await
    }
}

// ── Document items ───────────────────────────────────────────────────────────

pub struct DocumentItems<'a> {
    pub(crate) client: &'a ApiClient,
}

impl DocumentItems<'_> {
    pub async fn by_document(
        &self,
        session: &mut Session,
        document_id: i32,
    ) -> Result<Vec<DocumentItem>, ClientError> {
        let url = self
            .client
            .url(&format!("documentItems/byDocument/{document_id}"))?;
        json(self.client.send(session, Call::new(Method::GET, url)).await?).await
    }

    pub async fn all_items(
        &self,
        session: &mut Session,
    ) -> Result<Vec<ProductSummary>, ClientError> {
        let url = self.client.url("documentItems/allItems")?;
        json(self.client.send(session, Call::new(Method::GET, url)).await?).await
    }

    /// Add an item. The server picks the ordinal.
    pub async fn add(
        &self,
        session: &mut Session,
        document_id: i32,
        item: &ItemInput,
    ) -> Result<DocumentItem, ClientError> {
        let url = self
            .client
            .url(&format!("documentItems/addItemToDocument/{document_id}"))?;
        let call = Call::new(Method::POST, url).json(item)?;
        json(self.client.send(session, call).await?).await
    }

    pub async fn update(
        &self,
        session: &mut Session,
        document_id: i32,
        ordinal: i32,
        item: &ItemInput,
    ) -> Result<(), ClientError> {
        let url = self
            .client
            .url(&format!("documentItems/update/{document_id}/item/{ordinal}"))?;
        let call = Call::new(Method::PUT, url).json(item)?;
        empty(self.client.send(session, call).await?).await
    }

    pub async fn delete(
        &self,
        session: &mut Session,
        document_id: i32,
        ordinal: i32,
    ) -> Result<(), ClientError> {
        let url = self
            .client
            .url(&format!("documentItems/delete/{document_id}/item/{ordinal}"))?;
        empty(self.client.send(session, Call::new(Method::DELETE, url)).await?).await
    }
}

// ── User data ────────────────────────────────────────────────────────────────

pub struct UserDataApi<'a> {
    pub(crate) client: &'a ApiClient,
}

impl UserDataApi<'_> {
    pub async fn get(&self, session: &mut Session) -> Result<UserData, ClientError> {
        let url = self.client.url("userData/getData")?;
        json(self.client.send(session, Call::new(Method::GET, url)).await?).await
    }

    pub async fn add(
        &self,
        session: &mut Session,
        data: &UserDataInput,
    ) -> Result<UserData, ClientError> {
        let call = Call::new(Method::POST, self.client.url("userData/addData")?).json(data)?;
        json(self.client.send(session, call).await?).await
    }

    pub async fn exists(&self, session: &mut Session) -> Result<bool, ClientError> {
        let url = self.client.url("userData/hasUserData")?;
        json(self.client.send(session, Call::new(Method::POST, url)).await?).await
    }

    pub async fn update(
        &self,
        session: &mut Session,
        data: &UserDataInput,
    ) -> Result<(), ClientError> {
        let call = Call::new(Method::PUT, self.client.url("userData/updateData")?).json(data)?;
        empty(self.client.send(session, call).await?).await
    }
}
