use crate::media::images::POSTER_EXTENSION;

/// File name a title's poster is stored under.
///
/// Only `/` is replaced (e.g. "Fahrenheit 9/11"). Two titles that differ
/// only in `/` versus `-` map to the same file.
pub fn poster_filename(title: &str) -> String {
    format!("{title}.{POSTER_EXTENSION}").replace('/', "-")
}
