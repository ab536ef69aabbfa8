//! Per-record-type wiring for page controllers.
//!
//! A `Resource` ties a record type to its table columns, form fields, API
//! path and request payload, so one controller implementation serves every
//! page.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::form::{FieldSpec, FormState};
use crate::models::{format_release_date, today, Album, Music};
use crate::table::{Column, TableRecord, ALBUM_COLUMNS, MUSIC_COLUMNS};
use crate::upload::FileKind;

pub trait Resource: 'static {
    type Record: TableRecord + Clone + DeserializeOwned + Send + 'static;
    type Payload: Serialize + Send + Sync + 'static;

    /// Singular display name ("Album").
    const NAME: &'static str;
    /// Tab title ("Albums").
    const TITLE: &'static str;
    /// API collection path, relative to the base URL.
    const PATH: &'static str;
    const COLUMNS: &'static [Column];
    const FIELDS: &'static [FieldSpec];
    /// Kind accepted by the cover file input.
    const COVER_KIND: FileKind;

    fn cover(record: &Self::Record) -> Option<&str>;

    /// Form values for `record`, in `FIELDS` order.
    fn hydrate(record: &Self::Record) -> Vec<String>;

    /// Request body from the form. `cover` is the freshly uploaded URL, if
    /// a new file was chosen.
    fn payload(form: &FormState, cover: Option<String>) -> Self::Payload;
}

fn release_date_or_today(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.trim().is_empty() => format_release_date(Some(raw)),
        _ => today(),
    }
}

pub struct AlbumResource;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPayload {
    pub name: String,
    pub description: String,
    pub release_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

const ALBUM_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("Album Name", "Enter Album Name", true),
    FieldSpec::date("Release Date", "Enter Album Release Date"),
    FieldSpec::text("Short Description", "Enter Short Description", true),
];

impl Resource for AlbumResource {
    type Record = Album;
    type Payload = AlbumPayload;

    const NAME: &'static str = "Album";
    const TITLE: &'static str = "Albums";
    const PATH: &'static str = "albums";
    const COLUMNS: &'static [Column] = ALBUM_COLUMNS;
    const FIELDS: &'static [FieldSpec] = ALBUM_FIELDS;
    const COVER_KIND: FileKind = FileKind::Image;

    fn cover(record: &Album) -> Option<&str> {
        record.image.as_deref()
    }

    fn hydrate(record: &Album) -> Vec<String> {
        vec![
            record.name.clone(),
            release_date_or_today(record.release_date.as_deref()),
            record.description.clone(),
        ]
    }

    fn payload(form: &FormState, cover: Option<String>) -> AlbumPayload {
        AlbumPayload {
            name: form.value(0).trim().to_string(),
            release_date: form.value(1).trim().to_string(),
            description: form.value(2).trim().to_string(),
            image: cover,
        }
    }
}

pub struct MusicResource;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicPayload {
    pub title: String,
    pub release_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

const MUSIC_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("Title", "Enter Music Title", true),
    FieldSpec::date("Release Date", "Enter Music Release Date"),
];

impl Resource for MusicResource {
    type Record = Music;
    type Payload = MusicPayload;

    const NAME: &'static str = "Music";
    const TITLE: &'static str = "Music";
    const PATH: &'static str = "musics";
    const COLUMNS: &'static [Column] = MUSIC_COLUMNS;
    const FIELDS: &'static [FieldSpec] = MUSIC_FIELDS;
    const COVER_KIND: FileKind = FileKind::Image;

    fn cover(record: &Music) -> Option<&str> {
        record.cover_image.as_deref()
    }

    fn hydrate(record: &Music) -> Vec<String> {
        vec![
            record.title.clone(),
            release_date_or_today(record.release_date.as_deref()),
        ]
    }

    fn payload(form: &FormState, cover: Option<String>) -> MusicPayload {
        MusicPayload {
            title: form.value(0).trim().to_string(),
            release_date: form.value(1).trim().to_string(),
            cover_image: cover,
        }
    }
}
