//! In-memory API doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use catalog_admin::api::{ApiError, CrudApi, ListPage};
use catalog_admin::controller::PageController;
use catalog_admin::models::{Album, RecordId};
use catalog_admin::query::QueryParam;
use catalog_admin::resource::{AlbumPayload, AlbumResource};
use catalog_admin::session::TokenSession;
use catalog_admin::upload::{ChosenFile, UploadProgress, Uploader};

/// Album API that records every call as a short string.
pub struct MockAlbums {
    pub calls: Mutex<Vec<String>>,
    pub fail: AtomicBool,
    pub albums: Mutex<Vec<Album>>,
    pub total_count: u32,
    /// When set, the next fetch blocks until the paired sender fires.
    gate: Mutex<Option<Receiver<()>>>,
    /// Fetches that have returned.
    pub fetches_served: AtomicUsize,
}

impl MockAlbums {
    pub fn new(albums: Vec<Album>, total_count: u32) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            albums: Mutex::new(albums),
            total_count,
            gate: Mutex::new(None),
            fetches_served: AtomicUsize::new(0),
        })
    }

    /// Hold the next fetch until the returned sender is used.
    pub fn hold_next_fetch(&self) -> Sender<()> {
        let (release, gate) = mpsc::channel();
        *self.gate.lock().unwrap() = Some(gate);
        release
    }

    pub fn served(&self) -> usize {
        self.fetches_served.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn log(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            Err(ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl CrudApi<AlbumResource> for MockAlbums {
    fn fetch_all(&self, query: &QueryParam) -> Result<ListPage<Album>, ApiError> {
        let pairs: Vec<String> = query
            .to_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        self.log(format!("fetch {}", pairs.join("&")))?;
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        let page = ListPage {
            items: self.albums.lock().unwrap().clone(),
            total_count: self.total_count,
        };
        self.fetches_served.fetch_add(1, Ordering::SeqCst);
        Ok(page)
    }

    fn create(&self, payload: &AlbumPayload) -> Result<Album, ApiError> {
        self.log(format!("create {} image={:?}", payload.name, payload.image))?;
        Ok(Album {
            id: 100,
            name: payload.name.clone(),
            description: payload.description.clone(),
            image: payload.image.clone(),
            release_date: Some(payload.release_date.clone()),
        })
    }

    fn update(&self, id: RecordId, payload: &AlbumPayload) -> Result<Album, ApiError> {
        self.log(format!("update {} {} image={:?}", id, payload.name, payload.image))?;
        Ok(Album {
            id,
            name: payload.name.clone(),
            description: payload.description.clone(),
            image: payload.image.clone(),
            release_date: Some(payload.release_date.clone()),
        })
    }

    fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        self.log(format!("delete {}", id))
    }
}

/// Uploader that answers with a URL derived from the file name.
pub struct MockUploader;

impl Uploader for MockUploader {
    fn upload(&self, file: &ChosenFile, progress: &UploadProgress) -> Result<String, ApiError> {
        progress.set(1, 1);
        Ok(format!("/uploads/{}", file.file_name()))
    }
}

pub fn album(id: RecordId, name: &str) -> Album {
    Album {
        id,
        name: name.to_string(),
        description: format!("About {}", name),
        image: Some(format!("/uploads/{}.png", id)),
        release_date: Some("2020-05-06".to_string()),
    }
}

/// Controller over the mock, signed in, with its first fetch applied and
/// the call log cleared.
pub fn loaded_controller(
    api: &Arc<MockAlbums>,
) -> (PageController<AlbumResource>, Arc<TokenSession>) {
    let session = Arc::new(TokenSession::new(Some("token".to_string())));
    let mut controller =
        PageController::<AlbumResource>::new(api.clone(), Arc::new(MockUploader), session.clone());
    controller.activate();
    controller.settle();
    api.clear_calls();
    (controller, session)
}
