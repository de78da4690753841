use color_eyre::eyre::Result;
use ratatui::{layout::Rect, Frame};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    action::{act, Action, Command, GameAction},
    cli::Cli,
    components::help::Help,
    config::Config,
    pages::{
        game::{Difficulty, GamePage},
        home::HomePage,
        Page, PageId,
    },
    tui, ui,
};

pub struct App {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    difficulty: Option<Difficulty>,
    should_quit: bool,
    should_suspend: bool,
    show_help: bool,
    pages: Vec<Box<dyn Page>>,
    active_page: PageId,
}

impl App {
    pub fn new(args: &Cli) -> Result<Self> {
        Self::with_config(args, Config::new()?)
    }

    pub fn with_config(args: &Cli, config: Config) -> Result<Self> {
        let home_page = HomePage::new()?;
        let game_page = GamePage::new(args.seed);

        Ok(Self {
            tick_rate: args.tick_rate,
            frame_rate: args.frame_rate,
            difficulty: args.difficulty,
            should_quit: false,
            should_suspend: false,
            show_help: false,
            config,
            pages: vec![Box::new(home_page), Box::new(game_page)],
            active_page: PageId::Home,
        })
    }

    fn get_active_page(&mut self) -> Result<&mut Box<dyn Page>> {
        let id = self.active_page;
        self.pages
            .iter_mut()
            .find(|page| page.id() == id)
            .ok_or_else(|| color_eyre::eyre::eyre!("No page registered for {id}"))
    }

    fn set_active_page(&mut self, id: PageId) {
        if self.active_page != id {
            log::info!("Switching to the {id} page");
            self.active_page = id;
        }
    }

    fn enter_tui(&self) -> Result<tui::Tui> {
        let mut tui = tui::Tui::new()?.mouse(true);
        tui.tick_rate(self.tick_rate);
        tui.frame_rate(self.frame_rate);
        tui.enter()?;
        Ok(tui)
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = self.enter_tui()?;

        for page in self.pages.iter_mut() {
            page.register_keymap(&self.config.keybindings.pages)?;
        }

        for page in self.pages.iter_mut() {
            page.register_action_handler(action_tx.clone())?;
        }

        if let Some(difficulty) = self.difficulty {
            action_tx.send(act!(Command::SelectDifficulty(difficulty)))?;
        }

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Tick => action_tx.send(act!(Command::Tick))?,
                    tui::Event::Render => action_tx.send(act!(Command::Render))?,
                    tui::Event::Resize(x, y) => action_tx.send(act!(Command::Resize(x, y)))?,
                    _ => {},
                }
                let global = match &e {
                    tui::Event::Key(key) => self.config.keybindings.global.action_for(key),
                    _ => None,
                };
                if let Some(action) = global {
                    action_tx.send(action)?;
                } else if !self.show_help {
                    if let Some(action) = self.get_active_page()?.handle_events(Some(e))? {
                        action_tx.send(action)?;
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                match action.command {
                    Command::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::Render => self.render(&mut tui, &action_tx)?,
                    _ => {},
                }
                if let Some(action) = self.dispatch(action)? {
                    action_tx.send(action)?
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(act!(Command::Resume))?;
                tui = self.enter_tui()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    /// Applies app-level commands, then hands the action to the active page.
    fn dispatch(&mut self, action: Action) -> Result<Option<Action>> {
        match &action.command {
            Command::Tick
            | Command::Render
            | Command::Game(GameAction::Step)
            | Command::Game(GameAction::Spawn) => {},
            command => log::debug!("{command:?}"),
        }
        match &action.command {
            Command::Quit => self.should_quit = true,
            Command::Suspend => self.should_suspend = true,
            Command::Resume => self.should_suspend = false,
            Command::ToggleShowHelp => self.show_help = !self.show_help,
            Command::Error(message) => log::error!("{message}"),
            Command::SelectDifficulty(_) => self.set_active_page(PageId::Game),
            Command::ChangeDifficulty => self.set_active_page(PageId::Home),
            _ => {},
        }
        // the help overlay pauses the pages, pending clock actions are dropped
        if self.show_help {
            return Ok(None);
        }
        self.get_active_page()?.update(action)
    }

    fn render(&mut self, tui: &mut tui::Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
        let mut result = Ok(());
        tui.draw(|f| result = self.draw(f))?;
        if let Err(e) = result {
            action_tx.send(act!(Command::Error(format!("Failed to draw: {:?}", e))))?;
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame<'_>) -> Result<()> {
        let Some(area) = ui::playable_screen(f.area()) else {
            ui::show_resize_screen_message(f);
            return Ok(());
        };
        let area = ui::render_border(f, area);

        self.get_active_page()?.draw(f, area)?;

        if self.show_help {
            self.draw_help(f, area);
        }

        Ok(())
    }

    fn draw_help(&mut self, f: &mut Frame<'_>, rect: Rect) {
        let page_bindings = self.config.keybindings.pages.get(&self.active_page).cloned().unwrap_or_default();
        let help = Help::new(vec![
            ("System".to_string(), self.config.keybindings.global.clone()),
            (self.active_page.to_string(), page_bindings),
        ]);

        f.render_widget(help, rect);
    }
}
