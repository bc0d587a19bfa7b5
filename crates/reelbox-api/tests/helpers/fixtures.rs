//! Upload payloads for integration tests.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;

/// `len` bytes that start like an MP4 `ftyp` box.
pub fn video_bytes(len: usize) -> Bytes {
    let mut data = vec![0u8; len];
    let header = b"\x00\x00\x00\x18ftypmp42";
    let n = header.len().min(len);
    data[..n].copy_from_slice(&header[..n]);
    Bytes::from(data)
}

pub fn file_part(filename: &str, mime_type: &str, data: Bytes) -> Part {
    Part::bytes(data).file_name(filename).mime_type(mime_type)
}

/// Single-upload form with the file in the `video` field.
pub fn single_video_form(filename: &str, mime_type: &str, data: Bytes) -> MultipartForm {
    MultipartForm::new().add_part("video", file_part(filename, mime_type, data))
}

/// Multi-upload form with every file in a `videos` field.
pub fn multi_video_form(files: &[(&str, &str, Bytes)]) -> MultipartForm {
    files
        .iter()
        .fold(MultipartForm::new(), |form, (name, mime, data)| {
            form.add_part("videos", file_part(name, mime, data.clone()))
        })
}
