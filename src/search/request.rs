//! Compiled search request

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentType {
    Video,
    Image,
    Link,
    Audio,
    File,
}

impl AttachmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentType::Video => "video",
            AttachmentType::Image => "image",
            AttachmentType::Link => "link",
            AttachmentType::Audio => "audio",
            AttachmentType::File => "file",
        }
    }
}

impl FromStr for AttachmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "video" => AttachmentType::Video,
            "image" => AttachmentType::Image,
            "link" => AttachmentType::Link,
            "audio" => AttachmentType::Audio,
            "file" => AttachmentType::File,
            other => return Err(format!("unknown attachment type: {}", other)),
        })
    }
}

impl fmt::Display for AttachmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-ready search parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredSearchRequest {
    /// Free text left after filters are removed
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mention: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_start: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_type: Option<AttachmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_wide: Option<bool>,
}

impl StructuredSearchRequest {
    /// Any criterion besides `server_wide`
    pub fn has_criteria(&self) -> bool {
        !self.query.is_empty()
            || self.author.is_some()
            || self.mention.is_some()
            || self.date_start.is_some()
            || self.date_end.is_some()
            || self.attachment_type.is_some()
    }
}

/// A date range picked outside the text, shown as `date-range`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ActiveDateRange {
    /// Range with bounds in order
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// The `between:` token the placeholder stands for
    pub fn to_filter(&self) -> String {
        format!(
            "between:{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_parse() {
        assert_eq!("IMAGE".parse::<AttachmentType>(), Ok(AttachmentType::Image));
        assert!("gif".parse::<AttachmentType>().is_err());
    }

    #[test]
    fn test_date_range_ordered() {
        let a = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let range = ActiveDateRange::new(a, b);
        assert_eq!(range.to_filter(), "between:2024-01-05..2024-03-01");
    }

    #[test]
    fn test_criteria() {
        let mut request = StructuredSearchRequest {
            server_wide: Some(true),
            ..Default::default()
        };
        assert!(!request.has_criteria());
        request.attachment_type = Some(AttachmentType::Link);
        assert!(request.has_criteria());
    }
}
