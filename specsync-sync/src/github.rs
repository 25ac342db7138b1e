//! GitHub REST implementation of [`RemoteRepository`] over blocking `ureq`.
//!
//! | Operation             | Endpoint                                    |
//! |-----------------------|---------------------------------------------|
//! | `branch_head`         | `GET  /repos/{o}/{r}/branches/{branch}`     |
//! | `create_branch`       | `POST /repos/{o}/{r}/git/refs`              |
//! | `get_file`            | `GET  /repos/{o}/{r}/contents/{path}?ref=`  |
//! | `create_file`         | `PUT  /repos/{o}/{r}/contents/{path}`       |
//! | `update_file`         | `PUT  /repos/{o}/{r}/contents/{path}` + sha |
//! | `create_pull_request` | `POST /repos/{o}/{r}/pulls`                 |

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use specsync_core::{ConfigError, SyncConfig};

use crate::error::{RemoteError, SyncError};
use crate::remote::{
    FileWrite, PullRequest, PullRequestRequest, RemoteFile, RemoteRepository, Token,
};

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("specsync/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BranchResponse {
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    path: String,
    sha: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    html_url: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GitHubClient {
    agent: ureq::Agent,
    api_url: String,
    owner: String,
    repo: String,
    token: Token,
}

impl GitHubClient {
    pub fn new(config: &SyncConfig, token: Token) -> Result<Self, SyncError> {
        let (owner, repo) = config.owner_and_name().ok_or_else(|| {
            ConfigError::Invalid(format!(
                "repository '{}' must be of the form owner/name",
                config.repository
            ))
        })?;
        let mut builder = ureq::AgentBuilder::new().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            agent: builder.build(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            token,
        })
    }

    fn repo_url(&self, tail: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_url, self.owner, self.repo, tail)
    }

    fn contents_url(&self, path: &str) -> String {
        self.repo_url(&format!("contents/{}", encode_path(path)))
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &format!("Bearer {}", self.token.expose()))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", API_VERSION)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        let response = self.request("GET", url).call().map_err(|e| map_err("GET", url, e))?;
        decode(url, response)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &str,
        body: &Value,
    ) -> Result<T, RemoteError> {
        let response = self
            .request(method, url)
            .send_json(body)
            .map_err(|e| map_err(method, url, e))?;
        decode(url, response)
    }

    fn put_contents(&self, write: &FileWrite, sha: Option<&str>) -> Result<(), RemoteError> {
        let url = self.contents_url(&write.path);
        let _: Value = self.send_json("PUT", &url, &contents_body(write, sha))?;
        Ok(())
    }
}

impl RemoteRepository for GitHubClient {
    fn branch_head(&self, branch: &str) -> Result<String, RemoteError> {
        let url = self.repo_url(&format!("branches/{}", encode_path(branch)));
        let branch: BranchResponse = self.get_json(&url)?;
        Ok(branch.commit.sha)
    }

    fn create_branch(&self, branch: &str, sha: &str) -> Result<(), RemoteError> {
        let url = self.repo_url("git/refs");
        let body = json!({ "ref": format!("refs/heads/{branch}"), "sha": sha });
        let _: Value = self.send_json("POST", &url, &body)?;
        Ok(())
    }

    fn get_file(&self, path: &str, git_ref: &str) -> Result<Option<RemoteFile>, RemoteError> {
        let url = self.contents_url(path);
        let response = match self.request("GET", &url).query("ref", git_ref).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(e) => return Err(map_err("GET", &url, e)),
        };
        let entry: ContentsResponse = decode(&url, response)?;
        if entry.kind != "file" {
            return Err(RemoteError::Decode {
                url,
                message: format!("{} is a {}, not a file", entry.path, entry.kind),
            });
        }
        Ok(Some(RemoteFile {
            path: entry.path,
            sha: entry.sha,
        }))
    }

    fn create_file(&self, write: &FileWrite) -> Result<(), RemoteError> {
        self.put_contents(write, None)
    }

    fn update_file(&self, write: &FileWrite, sha: &str) -> Result<(), RemoteError> {
        self.put_contents(write, Some(sha))
    }

    fn create_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> Result<PullRequest, RemoteError> {
        let url = self.repo_url("pulls");
        let body = json!({
            "title": request.title,
            "body": request.body,
            "head": request.head,
            "base": request.base,
        });
        let pr: PullResponse = self.send_json("POST", &url, &body)?;
        Ok(PullRequest {
            number: pr.number,
            html_url: pr.html_url,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Body for `PUT /contents/{path}`; `sha` present only for updates.
fn contents_body(write: &FileWrite, sha: Option<&str>) -> Value {
    let mut body = json!({
        "message": write.message,
        "content": STANDARD.encode(write.content.as_bytes()),
        "branch": write.branch,
    });
    if let (Some(sha), Some(map)) = (sha, body.as_object_mut()) {
        map.insert("sha".to_owned(), Value::String(sha.to_owned()));
    }
    body
}

/// Percent-encode each path segment, keeping `/` separators.
fn encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.trim_start_matches('/').bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

fn decode<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T, RemoteError> {
    response.into_json().map_err(|e| RemoteError::Decode {
        url: url.to_owned(),
        message: e.to_string(),
    })
}

fn map_err(method: &'static str, url: &str, err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            RemoteError::Status {
                method,
                url: url.to_owned(),
                status,
                message: error_message(&body),
            }
        }
        ureq::Error::Transport(transport) => RemoteError::Transport {
            method,
            url: url.to_owned(),
            message: transport.to_string(),
        },
    }
}

/// GitHub error bodies look like `{"message": "...", ...}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| body.trim().to_owned())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
