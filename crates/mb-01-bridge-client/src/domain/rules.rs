//! Header rules for media fetches.
//!
//! Video and image hosts often require a `Referer` or similar header. The
//! extension can attach those on the page's behalf, but only for URLs it was
//! told about through `update-rules`.

use shared_types::{FileUrl, UpdateRulesRequest};

/// Files that need headers attached when fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    files: Vec<FileUrl>,
}

impl RuleSet {
    /// Keep only files that carry at least one header.
    pub fn from_files<I>(files: I) -> Self
    where
        I: IntoIterator<Item = FileUrl>,
    {
        Self {
            files: files.into_iter().filter(FileUrl::has_headers).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn files(&self) -> &[FileUrl] {
        &self.files
    }

    pub fn into_request(self) -> UpdateRulesRequest {
        UpdateRulesRequest {
            file_urls: self.files,
        }
    }
}
