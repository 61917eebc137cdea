//! `services`: is anything listening on the ports I care about?
//!
//! Ports come from `services.toml` in the data directory:
//!
//! ```toml
//! [[service]]
//! name = "api"
//! port = 8080
//! ```

use super::{ContentBlock, Module, RenderContext};
use crate::ui::theme::Tone;
use anyhow::{Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use serde::Deserialize;
use std::fs;
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::time::Duration;

const SERVICES_FILE: &str = "services.toml";
const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
const SERVICES_LIMIT: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub name: Option<String>,
    pub port: u16,
}

impl Service {
    fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("localhost:{}", self.port))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServicesFile {
    #[serde(default)]
    service: Vec<Service>,
}

pub struct ServicesModule {
    path: PathBuf,
}

impl ServicesModule {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SERVICES_FILE),
        }
    }

    /// Configured services, or the single default when none are configured.
    fn services(&self) -> Result<Vec<Service>> {
        if !self.path.exists() {
            return Ok(default_services());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let file: ServicesFile = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        if file.service.is_empty() {
            return Ok(default_services());
        }
        Ok(file.service)
    }
}

fn default_services() -> Vec<Service> {
    vec![Service {
        name: None,
        port: 8080,
    }]
}

fn is_listening(port: u16) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).is_ok()
}

impl Module for ServicesModule {
    fn name(&self) -> &str {
        "services"
    }

    fn render(&self, _ctx: &RenderContext) -> Result<ContentBlock> {
        let services = self.services()?;
        let mut lines = Vec::new();
        let mut up = 0;

        for service in services.iter().take(SERVICES_LIMIT) {
            let ok = is_listening(service.port);
            if ok {
                up += 1;
            }
            let (dot, label) = if ok {
                (Color::Green, Style::default())
            } else {
                (Color::Red, Style::default().fg(Color::DarkGray))
            };
            lines.push(Line::from(vec![
                Span::styled("  ● ", Style::default().fg(dot)),
                Span::styled(service.label(), label),
                Span::styled(
                    format!(" :{}", service.port),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }

        let checked = services.len().min(SERVICES_LIMIT);
        let summary = if up == checked {
            Color::Green
        } else {
            Color::Yellow
        };
        lines.push(Line::default());
        let mut footer = vec![Span::styled(
            format!("  {up}/{checked} up"),
            Style::default().fg(summary),
        )];
        if !self.path.exists() {
            footer.push(Span::styled(
                format!("  configure {}", self.path.display()),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(footer));

        let border = if up == checked { Tone::Accent } else { Tone::Warn };
        Ok(ContentBlock::new("SERVICES", Text::from(lines)).with_border(border))
    }
}
