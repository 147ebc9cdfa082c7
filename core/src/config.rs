/*
 * config.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of buzz_core, a client library for the Buzz activity API.
 *
 * buzz_core is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * buzz_core is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with buzz_core.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Client configuration and persisted OAuth token pairs.
//!
//! [`ClientConfig`] carries every service and OAuth endpoint so tests and
//! alternative deployments can point the client elsewhere. Token pairs are kept
//! in a small XML file (`~/.buzz/credentials`) read and written with quick_xml:
//! `<credentials><credential><key/><token/><secret/></credential>...</credentials>`,
//! one `<credential>` per consumer key.

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

use crate::error::{BuzzError, Result};
use crate::oauth::{READONLY_SCOPE, WRITE_SCOPE};

/// OAuth 1.0a endpoints. The request-token and authorize URLs get `?scope=` appended per handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth1Endpoints {
    pub request_token_url: String,
    pub access_token_url: String,
    pub authorize_url: String,
}

impl Default for OAuth1Endpoints {
    fn default() -> Self {
        Self {
            request_token_url: "https://www.google.com/accounts/OAuthGetRequestToken".to_string(),
            access_token_url: "https://www.google.com/accounts/OAuthGetAccessToken".to_string(),
            authorize_url: "https://www.google.com/buzz/api/auth/OAuthAuthorizeToken".to_string(),
        }
    }
}

/// OAuth 2.0 authorization dialog and token endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Endpoints {
    pub auth_url: String,
    pub token_url: String,
}

impl Default for OAuth2Endpoints {
    fn default() -> Self {
        Self {
            auth_url: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_url: "https://accounts.google.com/o/oauth2/token".to_string(),
        }
    }
}

/// Service endpoints and scopes used by the client facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base of activity URLs; ends with `/`.
    pub activities_url: String,
    /// Base of people URLs; ends with `/`.
    pub people_url: String,
    pub readonly_scope: String,
    pub write_scope: String,
    pub oauth1: OAuth1Endpoints,
    pub oauth2: OAuth2Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            activities_url: "https://www.googleapis.com/buzz/v1/activities/".to_string(),
            people_url: "https://www.googleapis.com/buzz/v1/people/".to_string(),
            readonly_scope: READONLY_SCOPE.to_string(),
            write_scope: WRITE_SCOPE.to_string(),
            oauth1: OAuth1Endpoints::default(),
            oauth2: OAuth2Endpoints::default(),
        }
    }
}

/// Default config directory: ~/.buzz.
pub fn default_config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from).map(|h| h.join(".buzz"))
}

/// Default credentials path: ~/.buzz/credentials.
pub fn default_credentials_path() -> Option<PathBuf> {
    default_config_dir().map(|d| d.join("credentials"))
}

/// Stored token pair for one consumer key. For OAuth2 `secret` holds the refresh token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialEntry {
    pub token: String,
    pub secret: String,
}

/// Reject NUL (U+0000) since XML cannot represent it.
fn contains_nul(s: &str) -> bool {
    s.contains('\0')
}

/// Load all stored token pairs keyed by consumer key. A missing file yields an empty map.
pub fn load_credentials(path: &Path) -> Result<BTreeMap<String, CredentialEntry>> {
    let raw = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(BuzzError::io(format!("{}: {}", path.display(), e))),
    };
    let content = String::from_utf8(raw)
        .map_err(|e| BuzzError::parsing(format!("credentials file not valid UTF-8: {}", e)))?;
    load_credentials_xml(&content)
}

#[derive(Clone, Copy, PartialEq)]
enum CredentialField {
    Key,
    Token,
    Secret,
}

fn load_credentials_xml(content: &str) -> Result<BTreeMap<String, CredentialEntry>> {
    // Values are kept verbatim; only text inside key/token/secret is read.
    let mut reader = Reader::from_str(content);
    let mut buf = Vec::new();
    let mut out = BTreeMap::new();
    let mut key = String::new();
    let mut entry = CredentialEntry::default();
    let mut in_credential = false;
    let mut field: Option<CredentialField> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => {
                let name = e.name();
                match name.as_ref() {
                    b"credential" => {
                        in_credential = true;
                        key.clear();
                        entry = CredentialEntry::default();
                    }
                    b"key" if in_credential => field = Some(CredentialField::Key),
                    b"token" if in_credential => field = Some(CredentialField::Token),
                    b"secret" if in_credential => field = Some(CredentialField::Secret),
                    _ => {}
                }
            }
            Event::Text(e) => {
                if let Some(f) = field {
                    let text = e.unescape()?;
                    match f {
                        CredentialField::Key => key = text.trim().to_string(),
                        CredentialField::Token => entry.token.push_str(&text),
                        CredentialField::Secret => entry.secret.push_str(&text),
                    }
                }
            }
            Event::End(e) => {
                let name = e.name();
                match name.as_ref() {
                    b"credential" => {
                        if !key.is_empty() {
                            out.insert(std::mem::take(&mut key), std::mem::take(&mut entry));
                        }
                        in_credential = false;
                    }
                    b"key" | b"token" | b"secret" => field = None,
                    _ => {}
                }
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

/// Store (or replace) the token pair for `key`, keeping every other entry.
pub fn save_credential(path: &Path, key: &str, token: &str, secret: &str) -> Result<()> {
    if contains_nul(key) || contains_nul(token) || contains_nul(secret) {
        return Err(BuzzError::validation("credential values must not contain NUL (U+0000)"));
    }
    if key.is_empty() {
        return Err(BuzzError::validation("credential key must not be empty"));
    }
    let mut entries = load_credentials(path)?;
    entries.insert(
        key.to_string(),
        CredentialEntry {
            token: token.to_string(),
            secret: secret.to_string(),
        },
    );
    write_credentials(path, &entries)
}

/// Remove the entry for `key`. Returns whether one was present.
pub fn delete_credential(path: &Path, key: &str) -> Result<bool> {
    let mut entries = load_credentials(path)?;
    if entries.remove(key).is_none() {
        return Ok(false);
    }
    write_credentials(path, &entries)?;
    Ok(true)
}

fn write_credentials(path: &Path, entries: &BTreeMap<String, CredentialEntry>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuzzError::io(e.to_string()))?;
        #[cfg(unix)]
        drop(fs::set_permissions(parent, PermissionsExt::from_mode(0o700)));
    }
    let bytes = credentials_xml_to_bytes(entries)?;
    let mut f = open_credentials_file_for_write(path)?;
    f.write_all(&bytes).map_err(|e| BuzzError::io(e.to_string()))?;
    f.flush().map_err(|e| BuzzError::io(e.to_string()))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn credentials_xml_to_bytes(entries: &BTreeMap<String, CredentialEntry>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut writer = Writer::new(&mut out);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("credentials")))?;
    for (key, entry) in entries {
        writer.write_event(Event::Start(BytesStart::new("credential")))?;
        write_text_element(&mut writer, "key", key)?;
        write_text_element(&mut writer, "token", &entry.token)?;
        write_text_element(&mut writer, "secret", &entry.secret)?;
        writer.write_event(Event::End(BytesEnd::new("credential")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("credentials")))?;
    Ok(out)
}

/// On Unix the file is created with mode 0o600 (owner read/write only).
fn open_credentials_file_for_write(path: &Path) -> Result<File> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| BuzzError::io(e.to_string()))
    }
    #[cfg(not(unix))]
    {
        File::create(path).map_err(|e| BuzzError::io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("buzz_core_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("credentials")
    }

    #[test]
    fn test_default_config_points_at_buzz_v1() {
        let c = ClientConfig::default();
        assert_eq!(c.activities_url, "https://www.googleapis.com/buzz/v1/activities/");
        assert_eq!(c.people_url, "https://www.googleapis.com/buzz/v1/people/");
        assert_eq!(c.write_scope, "https://www.googleapis.com/auth/buzz");
        assert_eq!(c.oauth2.token_url, "https://accounts.google.com/o/oauth2/token");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = temp_path("missing");
        assert!(load_credentials(&path).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_path("round_trip");
        save_credential(&path, "anonymous", "tok<1>", "s&cret").unwrap();
        save_credential(&path, "other", "t2", "").unwrap();
        save_credential(&path, "anonymous", "tok2", "sec2").unwrap();

        let creds = load_credentials(&path).unwrap();
        assert_eq!(creds.len(), 2);
        assert_eq!(
            creds.get("anonymous"),
            Some(&CredentialEntry {
                token: "tok2".to_string(),
                secret: "sec2".to_string()
            })
        );
        assert_eq!(creds.get("other").map(|e| e.secret.as_str()), Some(""));

        assert!(delete_credential(&path, "other").unwrap());
        assert!(!delete_credential(&path, "other").unwrap());
        assert_eq!(load_credentials(&path).unwrap().len(), 1);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_escaped_values_survive() {
        let path = temp_path("escaped");
        save_credential(&path, "k", "a<b>&c", "\"quoted\"").unwrap();
        let creds = load_credentials(&path).unwrap();
        assert_eq!(creds["k"].token, "a<b>&c");
        assert_eq!(creds["k"].secret, "\"quoted\"");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_rejects_nul() {
        let path = temp_path("nul");
        let err = save_credential(&path, "k", "a\0b", "s").unwrap_err();
        assert!(matches!(err, BuzzError::Validation(_)));
    }

    #[test]
    fn test_parse_ignores_entries_without_key() {
        let xml = "<credentials><credential><token>t</token></credential>\
                   <credential><key>k</key><token> t2 </token><secret>s</secret></credential></credentials>";
        let creds = load_credentials_xml(xml).unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds["k"].token, " t2 ");
    }

    #[test]
    fn test_surrounding_whitespace_in_values_survives() {
        let path = temp_path("whitespace");
        save_credential(&path, "k", "  tok ", "\tsecret\n").unwrap();
        let creds = load_credentials(&path).unwrap();
        assert_eq!(creds["k"].token, "  tok ");
        assert_eq!(creds["k"].secret, "\tsecret\n");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_indented_file_keys_are_trimmed() {
        let xml = "<credentials>\n  <credential>\n    <key> k </key>\n    <token>t</token>\n  </credential>\n</credentials>\n";
        let creds = load_credentials_xml(xml).unwrap();
        assert_eq!(creds["k"].token, "t");
        assert_eq!(creds["k"].secret, "");
    }
}
