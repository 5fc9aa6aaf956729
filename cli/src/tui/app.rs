use chrono::Local;
use pufftrack_core::{
    FileHistoryRepository, FileLimitRepository, FileTallyRepository, HistoryEntry, LimitService,
    RolloverUseCase, TallyService,
};
use ratatui::widgets::TableState;

use crate::locale::{self, Language};

#[derive(PartialEq, Clone, Copy)]
pub enum Tab {
    Today,
    History,
}

pub struct App {
    tally_repo: FileTallyRepository,
    history_repo: FileHistoryRepository,
    pub tally_service: TallyService<FileTallyRepository>,
    pub limit: u32,
    pub history: Vec<HistoryEntry>,
    pub tab: Tab,
    pub today_state: TableState,
    pub history_state: TableState,
    pub lang: Language,
    pub status: Option<String>,
}

impl App {
    pub fn new() -> anyhow::Result<App> {
        let tally_repo = FileTallyRepository::new(None)?;
        let history_repo = FileHistoryRepository::new(None)?;
        let tally_service = TallyService::load(tally_repo.clone())?;
        let limit = LimitService::load(FileLimitRepository::new(None)?)?.current();
        let history = RolloverUseCase::new(&tally_repo, &history_repo).history()?;
        let lang = locale::load_language(None);

        let mut today_state = TableState::default();
        if !tally_service.tally().is_empty() {
            today_state.select(Some(0));
        }
        let mut history_state = TableState::default();
        if !history.is_empty() {
            history_state.select(Some(0));
        }

        Ok(App {
            tally_repo,
            history_repo,
            tally_service,
            limit,
            history,
            tab: Tab::Today,
            today_state,
            history_state,
            lang,
            status: None,
        })
    }

    fn current_len(&self) -> usize {
        match self.tab {
            Tab::Today => self.tally_service.tally().smoke_times.len(),
            Tab::History => self.history.len(),
        }
    }

    fn current_state(&mut self) -> &mut TableState {
        match self.tab {
            Tab::Today => &mut self.today_state,
            Tab::History => &mut self.history_state,
        }
    }

    pub fn next(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let state = self.current_state();
        let i = match state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let state = self.current_state();
        let i = match state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Today => Tab::History,
            Tab::History => Tab::Today,
        };
        self.status = None;
    }

    pub fn toggle_language(&mut self) {
        let new_lang = self.lang.toggled();
        if locale::save_language(None, new_lang).is_ok() {
            self.lang = new_lang;
        }
    }

    pub fn smoke(&mut self) {
        match self.tally_service.add_event(Local::now()) {
            Ok(event) => {
                self.today_state.select(Some(0));
                self.status = Some(
                    locale::text(self.lang, "home.recorded").replace("{time}", &event.time),
                );
            }
            Err(_) => self.fail(),
        }
    }

    pub fn delete_selected(&mut self) {
        match self.tab {
            Tab::Today => self.delete_selected_event(),
            Tab::History => self.delete_selected_entry(),
        }
    }

    fn delete_selected_event(&mut self) {
        let Some(i) = self.today_state.selected() else {
            return;
        };
        let Some(event) = self.tally_service.tally().smoke_times.get(i) else {
            return;
        };
        let key = event.key.clone();
        match self.tally_service.remove_event(&key) {
            Ok(_) => {
                self.fix_selection(Tab::Today, i);
                self.status = Some(locale::text(self.lang, "home.removed").to_string());
            }
            Err(_) => self.fail(),
        }
    }

    fn delete_selected_entry(&mut self) {
        let Some(i) = self.history_state.selected() else {
            return;
        };
        let Some(entry) = self.history.get(i) else {
            return;
        };
        let id = entry.id.clone();
        let usecase = RolloverUseCase::new(&self.tally_repo, &self.history_repo);
        match usecase.delete_entry(&id) {
            Ok(_) => {
                self.reload_history();
                self.fix_selection(Tab::History, i);
                self.status = Some(locale::text(self.lang, "history.deleted").to_string());
            }
            Err(_) => self.fail(),
        }
    }

    /// Closes out the day. The in-memory tally is only reset once the
    /// use case has reported success.
    pub fn rollover(&mut self) {
        let usecase = RolloverUseCase::new(&self.tally_repo, &self.history_repo);
        let now = Local::now();
        match usecase.rollover(self.tally_service.tally(), self.limit, now) {
            Ok(entry) => {
                self.tally_service.reset();
                self.today_state.select(None);
                self.reload_history();
                if !self.history.is_empty() {
                    self.history_state.select(Some(0));
                }
                self.status = Some(
                    locale::text(self.lang, "rollover.done")
                        .replace("{count}", &entry.smoked_count.to_string())
                        .replace("{limit}", &entry.limit.to_string()),
                );
            }
            Err(_) => self.fail(),
        }
    }

    fn reload_history(&mut self) {
        let usecase = RolloverUseCase::new(&self.tally_repo, &self.history_repo);
        if let Ok(history) = usecase.history() {
            self.history = history;
        }
    }

    fn fix_selection(&mut self, tab: Tab, deleted_index: usize) {
        let len = match tab {
            Tab::Today => self.tally_service.tally().smoke_times.len(),
            Tab::History => self.history.len(),
        };
        let state = match tab {
            Tab::Today => &mut self.today_state,
            Tab::History => &mut self.history_state,
        };
        if len == 0 {
            state.select(None);
        } else if deleted_index >= len {
            state.select(Some(len - 1));
        } else {
            state.select(Some(deleted_index));
        }
    }

    fn fail(&mut self) {
        self.status = Some(locale::text(self.lang, "error.storage").to_string());
    }
}
