//! A [`TaskStore`] that talks to the REST document store of the backend

use std::error::Error;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Response;
use url::Url;

use crate::config::{client_name, BackendConfig};
use crate::document::{self, Document, ListPage};
use crate::task::{Task, TaskDraft, TaskId, TaskUpdate};
use crate::traits::TaskStore;
use crate::user::{Session, UserId};

/// How many documents are requested per listing page
const PAGE_SIZE: u32 = 300;

/// Tasks stored under `users/{uid}/tasks`, accessed with the ID token of a signed-in user
pub struct RemoteStore {
    documents_root: Url,
    id_token: String,
    http: reqwest::Client,
}

impl RemoteStore {
    /// A store that authenticates as the user of `session`
    pub fn new(config: &BackendConfig, session: &Session) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            documents_root: config.documents_root()?,
            id_token: session.id_token().to_string(),
            http: reqwest::Client::new(),
        })
    }

    fn collection_url(&self, user: &UserId) -> Result<Url, Box<dyn Error>> {
        let mut url = self.documents_root.clone();
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be a base URL", self.documents_root))?
            .pop_if_empty()
            .extend(&user.tasks_collection());
        Ok(url)
    }

    fn document_url(&self, user: &UserId, id: &TaskId) -> Result<Url, Box<dyn Error>> {
        let mut url = self.collection_url(user)?;
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be a base URL", self.documents_root))?
            .push(id.as_str());
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.id_token)
            .header("X-Client-Name", client_name())
    }

    /// The request a partial update turns into.
    ///
    /// An empty update writes nothing, and only checks that the task exists
    fn update_request(&self, user: &UserId, id: &TaskId, update: &TaskUpdate) -> Result<(reqwest::Method, Url, Option<Document>), Box<dyn Error>> {
        let mut url = self.document_url(user, id)?;
        if update.is_empty() {
            return Ok((reqwest::Method::GET, url, None));
        }
        update_query(&mut url, update);
        let body = Document::with_fields(document::fields_from_update(update));
        Ok((reqwest::Method::PATCH, url, Some(body)))
    }

    async fn list_page(&self, user: &UserId, page_token: Option<&str>) -> Result<ListPage, Box<dyn Error>> {
        let mut url = self.collection_url(user)?;
        url.query_pairs_mut().append_pair("pageSize", &PAGE_SIZE.to_string());
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }

        let response = self.request(reqwest::Method::GET, url).send().await?;
        let response = check_status(response).await?;
        let page: ListPage = response.json().await?;
        Ok(page)
    }
}

/// Turn any non-success reply into an error, with the body the server sent
async fn check_status(response: Response) -> Result<Response, Box<dyn Error>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(format!("Unexpected HTTP status code {:?}: {}", status, body).into())
}

/// Query pairs of a partial update: only the given fields are touched, and the document must exist
fn update_query(url: &mut Url, update: &TaskUpdate) {
    let mut pairs = url.query_pairs_mut();
    for path in update.field_paths() {
        pairs.append_pair("updateMask.fieldPaths", path);
    }
    pairs.append_pair("currentDocument.exists", "true");
}

#[async_trait]
impl TaskStore for RemoteStore {
    async fn create_task(&self, user: &UserId, draft: &TaskDraft) -> Result<TaskId, Box<dyn Error>> {
        let url = self.collection_url(user)?;
        log::debug!("Creating a task in {}", url);
        let body = Document::with_fields(document::fields_from_draft(draft));

        let response = self.request(reqwest::Method::POST, url).json(&body).send().await?;
        let response = check_status(response).await?;
        let created: Document = response.json().await?;

        let id = created.name.as_deref().and_then(document::id_from_name);
        match id {
            None => Err(format!("No document name in the creation reply ({:?})", created.name).into()),
            Some(id) => Ok(id),
        }
    }

    async fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, Box<dyn Error>> {
        let mut tasks = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.list_page(user, page_token.as_deref()).await?;
            let now = Utc::now();
            for doc in &page.documents {
                match document::parse(doc, now) {
                    Ok(task) => tasks.push(task),
                    Err(err) => log::warn!("Ignoring invalid document {:?}: {}", doc.name, err),
                }
            }

            match page.next_page_token {
                Some(token) if token.is_empty() == false => page_token = Some(token),
                _ => break,
            }
        }
        log::debug!("Fetched {} tasks for {}", tasks.len(), user);
        Ok(tasks)
    }

    async fn update_fields(&self, user: &UserId, id: &TaskId, update: &TaskUpdate) -> Result<(), Box<dyn Error>> {
        let (method, url, body) = self.update_request(user, id, update)?;
        log::debug!("Updating {:?} of task {}", update.field_paths(), id);

        let mut request = self.request(method, url);
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = request.send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_task(&self, user: &UserId, id: &TaskId) -> Result<(), Box<dyn Error>> {
        let url = self.document_url(user, id)?;
        log::debug!("Deleting task {}", id);

        let response = self.request(reqwest::Method::DELETE, url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RemoteStore {
        let session = Session::new(UserId::from("uid42"), String::from("a@b.c"), String::from("token"));
        RemoteStore::new(&BackendConfig::new("k", "todo-db"), &session).unwrap()
    }

    #[test]
    fn urls() {
        let store = store();
        let user = UserId::from("uid42");
        assert_eq!(
            store.collection_url(&user).unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/todo-db/databases/(default)/documents/users/uid42/tasks"
        );
        assert_eq!(
            store.document_url(&user, &TaskId::from("t1")).unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/todo-db/databases/(default)/documents/users/uid42/tasks/t1"
        );
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn futures_can_be_spawned() {
        let store = store();
        let user = UserId::from("uid42");
        let id = TaskId::from("t1");
        let draft = TaskDraft::new();
        let update = TaskUpdate::finished(true);

        assert_send(&store.list_page(&user, None));
        assert_send(&store.create_task(&user, &draft));
        assert_send(&store.list_tasks(&user));
        assert_send(&store.update_fields(&user, &id, &update));
        assert_send(&store.delete_task(&user, &id));
    }

    #[test]
    fn empty_updates_only_check_existence() {
        let store = store();
        let user = UserId::from("uid42");
        let id = TaskId::from("t1");

        let (method, url, body) = store.update_request(&user, &id, &TaskUpdate::default()).unwrap();
        assert_eq!(method, reqwest::Method::GET);
        assert_eq!(url, store.document_url(&user, &id).unwrap());
        assert!(body.is_none());

        let (method, url, body) = store.update_request(&user, &id, &TaskUpdate::finished(false)).unwrap();
        assert_eq!(method, reqwest::Method::PATCH);
        assert!(url.query().unwrap().contains("currentDocument.exists=true"));
        assert_eq!(body.unwrap().fields.len(), 1);
    }

    #[test]
    fn partial_updates_name_their_fields() {
        let store = store();
        let mut url = store.document_url(&UserId::from("uid42"), &TaskId::from("t1")).unwrap();
        update_query(&mut url, &TaskUpdate::finished(true));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![
            (String::from("updateMask.fieldPaths"), String::from("isFinished")),
            (String::from("currentDocument.exists"), String::from("true")),
        ]);
    }
}
