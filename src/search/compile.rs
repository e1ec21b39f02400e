//! Query compiler: display text -> structured search request

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::completion::FilterName;
use crate::error::QueryError;

use super::grammar::{self, FilterKind, FilterToken, TokenValue};
use super::request::{ActiveDateRange, AttachmentType, StructuredSearchRequest};
use super::UserIdentifierMapping;

/// Validate and compile the search bar text
///
/// `mapping` resolves `from:`/`mentions:` usernames picked through
/// autocomplete; `range` backs the `date-range` placeholder.
pub fn compile(
    display: &str,
    mapping: &UserIdentifierMapping,
    range: Option<&ActiveDateRange>,
) -> Result<StructuredSearchRequest, QueryError> {
    let text = display.trim();

    if grammar::count_date_ranges(text) > 1 {
        return Err(QueryError::MultipleDateRanges);
    }

    let text = match range {
        Some(range) => grammar::replace_date_range(text, &range.to_filter()),
        None => {
            if grammar::count_date_ranges(text) > 0 {
                tracing::debug!("date-range placeholder without a picked range, dropping it");
            }
            grammar::replace_date_range(text, "")
        }
    };

    let tokens = grammar::scan(&text);

    for kind in FilterKind::SINGLE_VALUED {
        if tokens.iter().filter(|t| t.kind == kind).count() > 1 {
            return Err(QueryError::DuplicateFilter(kind));
        }
    }

    if grammar::count_attachment_filters(&text) > 1 {
        return Err(QueryError::MultipleAttachmentFilters);
    }

    if grammar::has_incomplete(&text) {
        return Err(QueryError::IncompleteFilter);
    }

    let mut request = StructuredSearchRequest::default();
    for token in &tokens {
        apply(&mut request, token, mapping)?;
    }
    request.query = residual(&text, &tokens);

    if request.server_wide == Some(true) && !request.has_criteria() {
        return Err(QueryError::ServerWideRequiresCriteria);
    }

    if request.server_wide.is_none() && !request.has_criteria() {
        return Err(QueryError::EmptyQuery);
    }

    Ok(request)
}

fn apply(
    request: &mut StructuredSearchRequest,
    token: &FilterToken,
    mapping: &UserIdentifierMapping,
) -> Result<(), QueryError> {
    match (&token.kind, &token.value) {
        (FilterKind::From, TokenValue::Text(username)) => {
            request.author = resolve_user(mapping, FilterName::From, username);
        }
        (FilterKind::Mentions, TokenValue::Text(username)) => {
            request.mention = resolve_user(mapping, FilterName::Mentions, username);
        }
        (FilterKind::Before, TokenValue::Text(date)) => {
            request.date_end = Some(start_of_day(parse_date(date)?));
        }
        (FilterKind::After, TokenValue::Text(date)) => {
            request.date_start = Some(end_of_day(parse_date(date)?));
        }
        (FilterKind::During, TokenValue::Text(date)) => {
            let date = parse_date(date)?;
            request.date_start = Some(start_of_day(date));
            request.date_end = Some(end_of_day(date));
        }
        (FilterKind::Between, TokenValue::Range(a, b)) => {
            let (a, b) = (parse_date(a)?, parse_date(b)?);
            request.date_start = Some(start_of_day(a.min(b)));
            request.date_end = Some(end_of_day(a.max(b)));
        }
        (FilterKind::Has, TokenValue::Text(kind)) => {
            request.attachment_type = kind.parse::<AttachmentType>().ok();
        }
        (FilterKind::ServerWide, _) => {
            request.server_wide = Some(true);
        }
        (kind, value) => {
            tracing::warn!(?kind, ?value, "unexpected filter token");
        }
    }
    Ok(())
}

fn resolve_user(mapping: &UserIdentifierMapping, filter: FilterName, username: &str) -> Option<String> {
    let id = mapping.get(filter, username).map(str::to_string);
    if id.is_none() {
        tracing::debug!(%filter, username, "username was never picked from suggestions, dropping");
    }
    id
}

/// Text with every filter token removed, whitespace collapsed
fn residual(text: &str, tokens: &[FilterToken]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for token in tokens {
        out.push_str(&text[pos..token.bytes.start]);
        out.push(' ');
        pos = token.bytes.end;
    }
    out.push_str(&text[pos..]);

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_date(value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| QueryError::InvalidDate(value.to_string()))
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Local> {
    local(date.and_time(NaiveTime::MIN))
}

pub fn end_of_day(date: NaiveDate) -> DateTime<Local> {
    local(date.and_time(NaiveTime::MIN) + Duration::milliseconds(86_399_999))
}

/// Interpret a wall-clock time in the local zone
///
/// Ambiguous times take the earlier instant; times skipped by a DST jump
/// move forward an hour.
fn local(naive: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}
