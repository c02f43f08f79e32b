//! Terminal application: owns the terminal, the model and the message queue

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hostlens_api::{ApiClient, MonitoringApi};
use hostlens_config::AppConfig;
use hostlens_http::{shared_client, HttpConfig};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::effects::EffectRunner;
use crate::error::TuiResult;
use crate::event::EventLoop;
use crate::model::{AppMessage, AppModel, ModelSettings};
use crate::update::Command;
use crate::view;

/// Build the backend client described by `config`
pub fn build_api(config: &AppConfig) -> TuiResult<Arc<dyn MonitoringApi>> {
    let mut http_config = HttpConfig::default();
    if let Some(secs) = config.api.timeout_secs {
        http_config = http_config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(proxy) = &config.api.proxy {
        http_config = http_config.with_proxy(proxy.clone());
    }
    if let Some(agent) = &config.api.user_agent {
        http_config = http_config.with_user_agent(agent.clone());
    }
    let http = shared_client(http_config)?;
    let api = ApiClient::new(http, &config.api.base_url)?;
    Ok(Arc::new(api))
}

/// Model, effect runner and message queue, without a terminal
///
/// Split out so the message flow can be driven in tests.
pub struct Runtime {
    model: AppModel,
    runner: EffectRunner,
    tx: UnboundedSender<AppMessage>,
    rx: UnboundedReceiver<AppMessage>,
}

impl Runtime {
    pub fn new(api: Arc<dyn MonitoringApi>, settings: ModelSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = EffectRunner::new(api, tx.clone(), settings.time_period_hours);

        Self {
            model: AppModel::init(settings),
            runner,
            tx,
            rx,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    /// Sender for terminal events
    pub fn sender(&self) -> UnboundedSender<AppMessage> {
        self.tx.clone()
    }

    /// Issue the start-up requests
    pub fn start(&mut self) {
        let model = std::mem::take(&mut self.model);
        let (model, commands) = model.bootstrap();
        self.model = model;
        self.execute(commands);
    }

    /// Run one message through `update` and execute the resulting commands
    pub fn dispatch(&mut self, message: AppMessage) {
        let model = std::mem::take(&mut self.model);
        let (model, commands) = model.update(message);
        self.model = model;
        self.execute(commands);
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            if command == Command::Quit {
                self.model.should_quit = true;
                continue;
            }
            self.runner.execute(command);
        }
    }

    /// Wait for the next message; `None` once every sender is gone
    pub async fn next_message(&mut self) -> Option<AppMessage> {
        self.rx.recv().await
    }

    /// Apply every message already queued without waiting
    pub fn drain_pending(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.dispatch(message);
        }
    }
}

/// The running dashboard
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    runtime: Runtime,
    events: EventLoop,
}

impl App {
    /// Set up the terminal and wire the backend client
    pub fn new(config: &AppConfig) -> TuiResult<Self> {
        let api = build_api(config)?;
        let runtime = Runtime::new(api, ModelSettings::from(config));

        enable_raw_mode()?;
        let terminal = match enter_alternate_screen() {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = disable_raw_mode();
                return Err(e.into());
            }
        };

        let events = EventLoop::spawn(
            runtime.sender(),
            Duration::from_millis(config.ui.tick_rate_ms),
        );

        Ok(Self {
            terminal,
            runtime,
            events,
        })
    }

    /// Run until the user quits
    pub async fn run(&mut self) -> TuiResult<()> {
        info!("Dashboard started");
        self.runtime.start();

        while !self.runtime.model().should_quit {
            let model = self.runtime.model();
            self.terminal.draw(|frame| view::render(frame, model))?;

            let Some(message) = self.runtime.next_message().await else {
                debug!("Message channel closed");
                break;
            };
            self.runtime.dispatch(message);
            self.runtime.drain_pending();
        }

        self.events.stop();
        info!("Dashboard stopped");
        Ok(())
    }
}

fn enter_alternate_screen() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
