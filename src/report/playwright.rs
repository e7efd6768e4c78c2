use std::{path::PathBuf, process::Stdio, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    process::{Child, ChildStdin, ChildStdout, Command},
};
use tracing::{debug, warn};

use super::browser::{Browser, Locator};
use crate::{config::PlaywrightConfig, error::BrowserError};

const BRIDGE_SCRIPT: &str = include_str!("bridge.js");
const EXIT_TIMEOUT: Duration = Duration::from_secs(10);

/// A headless Chromium page driven through a Node.js Playwright bridge.
///
/// The bridge reads one JSON instruction per line on stdin and answers each
/// with one JSON reply line on stdout, in order. The process is killed if this
/// handle is dropped without being closed.
pub struct PlaywrightBrowser {
    child: Child,
    stdin: ChildStdin,
    replies: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

#[derive(serde::Serialize)]
struct Request<'a> {
    id: u64,
    #[serde(flatten)]
    instruction: Instruction<'a>,
}

#[derive(serde::Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum Instruction<'a> {
    Launch { headless: bool },
    Goto { url: &'a str },
    Fill { target: &'a Locator, value: &'a str },
    Click { target: &'a Locator },
    WaitForUrl { pattern: &'a str },
    WaitFor { target: &'a Locator },
    Download { trigger: &'a Locator },
    Close,
}

impl Instruction<'_> {
    fn step(&self) -> &'static str {
        match self {
            Self::Launch { .. } => "launch",
            Self::Goto { .. } => "goto",
            Self::Fill { .. } => "fill",
            Self::Click { .. } => "click",
            Self::WaitForUrl { .. } => "wait_for_url",
            Self::WaitFor { .. } => "wait_for",
            Self::Download { .. } => "download",
            Self::Close => "close",
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct Reply {
    id: u64,
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    path: Option<PathBuf>,
}

impl PlaywrightBrowser {
    #[tracing::instrument(skip_all, fields(node = %config.node, headless = config.headless))]
    pub async fn launch(config: &PlaywrightConfig) -> Result<Self, BrowserError> {
        let mut child = Command::new(&config.node)
            .arg("-e")
            .arg(BRIDGE_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let (stdin, stdout, stderr) = match (
            child.stdin.take(),
            child.stdout.take(),
            child.stderr.take(),
        ) {
            (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
            _ => return Err(BrowserError::Disconnected),
        };

        // Node and Playwright report startup problems on stderr only.
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!(%line, "playwright bridge stderr");
            }
        });

        let mut browser = Self {
            child,
            stdin,
            replies: BufReader::new(stdout).lines(),
            next_id: 1,
        };
        browser
            .send(Instruction::Launch {
                headless: config.headless,
            })
            .await?;

        Ok(browser)
    }

    async fn send(&mut self, instruction: Instruction<'_>) -> Result<Reply, BrowserError> {
        let id = self.next_id;
        self.next_id += 1;
        let step = instruction.step();

        let mut line = serde_json::to_vec(&Request { id, instruction })?;
        line.push(b'\n');
        self.stdin.write_all(&line).await?;
        self.stdin.flush().await?;
        debug!(id, step, "sent instruction to playwright bridge");

        let line = self
            .replies
            .next_line()
            .await?
            .ok_or(BrowserError::Disconnected)?;
        let reply: Reply = serde_json::from_str(&line)?;

        if reply.id != id {
            return Err(BrowserError::OutOfSync {
                expected: id,
                got: reply.id,
            });
        }
        if !reply.ok {
            return Err(BrowserError::Step {
                step,
                message: reply.error.unwrap_or_default(),
            });
        }
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl Browser for PlaywrightBrowser {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.send(Instruction::Goto { url }).await.map(drop)
    }

    async fn fill(&mut self, target: &Locator, value: &str) -> Result<(), BrowserError> {
        self.send(Instruction::Fill { target, value }).await.map(drop)
    }

    async fn click(&mut self, target: &Locator) -> Result<(), BrowserError> {
        self.send(Instruction::Click { target }).await.map(drop)
    }

    async fn wait_for_url(&mut self, pattern: &str) -> Result<(), BrowserError> {
        self.send(Instruction::WaitForUrl { pattern }).await.map(drop)
    }

    async fn wait_for(&mut self, target: &Locator) -> Result<(), BrowserError> {
        self.send(Instruction::WaitFor { target }).await.map(drop)
    }

    async fn download(&mut self, trigger: &Locator) -> Result<PathBuf, BrowserError> {
        let reply = self.send(Instruction::Download { trigger }).await?;
        reply.path.ok_or_else(|| BrowserError::Step {
            step: "download",
            message: "no download path was reported".to_string(),
        })
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        let closed = self.send(Instruction::Close).await.map(drop);

        match tokio::time::timeout(EXIT_TIMEOUT, self.child.wait()).await {
            Ok(Ok(status)) => debug!(%status, "playwright bridge exited"),
            Ok(Err(error)) => warn!(%error, "failed to wait for playwright bridge"),
            Err(_) => {
                warn!("playwright bridge did not exit, killing it");
                self.child.kill().await?;
            }
        }

        closed
    }
}
