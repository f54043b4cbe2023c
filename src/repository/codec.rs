//! Line codecs for the durable catalog and user files.
//!
//! Books are stored one per line, pipe-delimited, ten fields in fixed order:
//!
//! `id|title|author|isAvailable|borrowedBy|genre|coverUrl|dueDate|rating|ratingCount`
//!
//! Empty optional fields are written as sentinel tokens so no field on disk
//! is ever empty: `NONE` for the borrower and cover URL, `General` for the
//! genre. The sentinels are reversed on decode, which makes encode/decode
//! exact inverses for the full format but also means a value literally equal
//! to its sentinel cannot be told apart from "unset". Text fields must not
//! contain the `|` delimiter or a newline; the format does no escaping.
//!
//! A record is accepted with as few as four fields (id, title, author,
//! availability); missing trailing fields default to their zero values.
//! This allows loading files written by older, shorter-line formats. A
//! missing trailing genre therefore decodes to unset (empty), the same
//! state the `General` sentinel decodes to — not the literal token.
//!
//! Users are stored one per line as `username password-hash role`,
//! whitespace-delimited. Usernames and hashes must not contain whitespace;
//! that is a constraint of the format, not enforced here.

use thiserror::Error;

use crate::models::{Book, Role, User};

/// Field separator of the catalog file.
pub const FIELD_DELIMITER: char = '|';

const NONE_SENTINEL: &str = "NONE";
const GENRE_SENTINEL: &str = "General";

/// A decodable book record needs at least id, title, author and availability.
const MIN_BOOK_FIELDS: usize = 4;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("book record has {0} fields, expected at least 4")]
    ShortBookRecord(usize),

    #[error("user record must be exactly `username password-hash role`")]
    MalformedUserRecord,

    #[error("invalid {field} value {value:?}")]
    Field { field: &'static str, value: String },
}

/// Encodes a book as one catalog line, without a trailing newline.
pub fn encode_book(book: &Book) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
        book.id,
        book.title,
        book.author,
        u8::from(book.is_available),
        sentinel(&book.borrowed_by, NONE_SENTINEL),
        sentinel(&book.genre, GENRE_SENTINEL),
        sentinel(&book.cover_url, NONE_SENTINEL),
        book.due_date,
        book.rating,
        book.rating_count,
    )
}

/// Decodes one catalog line.
pub fn decode_book(line: &str) -> Result<Book, CodecError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() < MIN_BOOK_FIELDS {
        return Err(CodecError::ShortBookRecord(fields.len()));
    }

    Ok(Book {
        id: parse(fields[0], "id")?,
        title: fields[1].to_string(),
        author: fields[2].to_string(),
        is_available: fields[3] == "1",
        borrowed_by: optional(fields.get(4), NONE_SENTINEL),
        genre: optional(fields.get(5), GENRE_SENTINEL),
        cover_url: optional(fields.get(6), NONE_SENTINEL),
        due_date: parse_or_default(fields.get(7), "dueDate")?,
        rating: parse_or_default(fields.get(8), "rating")?,
        rating_count: parse_or_default(fields.get(9), "ratingCount")?,
    })
}

/// Decodes one user directory line.
pub fn decode_user(line: &str) -> Result<User, CodecError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(CodecError::MalformedUserRecord);
    }

    let role = Role::parse(tokens[2]).ok_or_else(|| CodecError::Field {
        field: "role",
        value: tokens[2].to_string(),
    })?;

    Ok(User {
        username: tokens[0].to_string(),
        password_hash: tokens[1].to_string(),
        role,
    })
}

fn sentinel<'a>(value: &'a str, token: &'a str) -> &'a str {
    if value.is_empty() {
        token
    } else {
        value
    }
}

fn optional(field: Option<&&str>, token: &str) -> String {
    match field {
        Some(&value) if value != token => value.to_string(),
        _ => String::new(),
    }
}

fn parse<T: std::str::FromStr>(raw: &str, field: &'static str) -> Result<T, CodecError> {
    raw.parse().map_err(|_| CodecError::Field {
        field,
        value: raw.to_string(),
    })
}

fn parse_or_default<T: std::str::FromStr + Default>(
    field: Option<&&str>,
    name: &'static str,
) -> Result<T, CodecError> {
    match field {
        Some(raw) => parse(raw, name),
        None => Ok(T::default()),
    }
}
