use crate::events::AppCommand;
use crate::indicator::Indicator;
use crate::model::{BoxSet, BoxStatus, BoxView};
use crate::services::registry;
use crate::services::state_machine::{BoxAction, BoxStateMachine};
use crate::services::CommandRunner;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Контекст приложения: единственный владелец набора боксов.
///
/// Все операции синхронные и выполняются по одной из основного цикла.
/// После каждой операции индикатор получает пересчитанное общее состояние.
pub struct App {
    config_dir: PathBuf,
    boxes: BoxSet,
    runner: Box<dyn CommandRunner + Send>,
    indicator: Box<dyn Indicator + Send>,
    running: bool,
}

impl App {
    pub fn new(
        config_dir: impl Into<PathBuf>,
        runner: Box<dyn CommandRunner + Send>,
        indicator: Box<dyn Indicator + Send>,
    ) -> Self {
        let config_dir = config_dir.into();
        info!("Инициализация App для {}", config_dir.display());
        Self {
            config_dir,
            boxes: BoxSet::new(),
            runner,
            indicator,
            running: true,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn list_boxes(&self) -> Vec<BoxView> {
        self.boxes.views()
    }

    pub fn combined_status(&self) -> BoxStatus {
        self.boxes.combined_status()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Полная перезагрузка: новый набор строится и опрашивается целиком и
    /// только потом заменяет старый. Если директорию прочитать нельзя,
    /// прежний набор и его состояния остаются как были.
    pub fn reload(&mut self) {
        info!("Перезагрузка боксов из {}", self.config_dir.display());

        match registry::scan(&self.config_dir) {
            Ok(mut new_boxes) => {
                let sm = BoxStateMachine::new(&*self.runner);
                debug!("Опрос боксов: {:?}", new_boxes.names());
                for lb in new_boxes.iter_mut() {
                    sm.refresh(lb);
                }
                self.boxes = new_boxes;
            }
            Err(e) => {
                warn!("Перезагрузка не удалась, оставляем прежний набор: {}", e);
                self.report_error(&e.to_string());
            }
        }

        self.publish();
    }

    /// Closed -> open, Opened -> close, Error -> повторный опрос.
    /// Неудачные open/close сообщаются пользователю ровно один раз.
    pub fn activate_box(&mut self, name: &str) {
        let sm = BoxStateMachine::new(&*self.runner);
        let Some(lb) = self.boxes.get_mut(name) else {
            self.report_error(&format!("Бокс {} не найден!", name));
            return;
        };

        let action = BoxAction::for_status(lb.status);
        debug!("Активация бокса {:?}: {}", name, action);

        let failure = match sm.apply(lb, action) {
            Ok(()) => None,
            Err(_) => match action {
                BoxAction::Open => Some(format!("Не удалось открыть бокс {}!", name)),
                BoxAction::Close => Some(format!("Не удалось закрыть бокс {}!", name)),
                BoxAction::Refresh => None,
            },
        };

        if let Some(message) = failure {
            self.report_error(&message);
        }
        self.publish();
    }

    /// Повторный опрос одного бокса; сбои видны только по состоянию
    pub fn refresh_box(&mut self, name: &str) {
        let sm = BoxStateMachine::new(&*self.runner);
        match self.boxes.get_mut(name) {
            Some(lb) => {
                sm.refresh(lb);
            }
            None => {
                self.report_error(&format!("Бокс {} не найден!", name));
                return;
            }
        }
        self.publish();
    }

    pub fn quit(&mut self) {
        info!("Получена команда завершения");
        self.running = false;
    }

    /// Выполнить одну команду целиком
    pub fn handle(&mut self, command: AppCommand) {
        debug!("Команда: {}", command);
        match command {
            AppCommand::Reload | AppCommand::DirectoryChanged => self.reload(),
            AppCommand::Activate(name) => self.activate_box(&name),
            AppCommand::Refresh(name) => self.refresh_box(&name),
            AppCommand::List => self.publish(),
            AppCommand::Quit => self.quit(),
        }
    }

    /// Основной цикл: команды выполняются строго по одной, пока не придёт
    /// `Quit` или не закроются все отправители. Блокирует поток.
    pub fn run(mut self, mut commands: mpsc::Receiver<AppCommand>) -> Self {
        info!("Основной цикл запущен");
        while self.is_running() {
            match commands.blocking_recv() {
                Some(command) => self.handle(command),
                None => {
                    info!("Все источники команд закрыты");
                    break;
                }
            }
        }
        info!("Основной цикл завершён");
        self
    }

    fn publish(&self) {
        self.indicator
            .status_changed(self.boxes.combined_status(), &self.boxes.views());
    }

    fn report_error(&self, message: &str) {
        self.indicator.show_error(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::process_runner::ProcessRunner;
    use crate::test_support::{
        runtime_handle, script_guard, write_plain, write_script, write_stateful_script,
        RecordingIndicator,
    };
    use std::fs;
    use std::time::Duration;

    fn app(dir: &Path) -> (App, RecordingIndicator) {
        let indicator = RecordingIndicator::new();
        let runner = ProcessRunner::new(runtime_handle(), Some(Duration::from_secs(5)), 4096);
        let app = App::new(dir, Box::new(runner), Box::new(indicator.clone()));
        (app, indicator)
    }

    fn view(name: &str, status: BoxStatus) -> BoxView {
        BoxView {
            name: name.to_string(),
            status,
        }
    }

    #[test]
    fn test_initial_state_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (app, indicator) = app(dir.path());
        assert!(app.list_boxes().is_empty());
        assert_eq!(app.combined_status(), BoxStatus::Closed);
        assert!(app.is_running());
        assert_eq!(app.config_dir(), dir.path());
        assert!(indicator.published().is_empty());
    }

    #[test]
    fn test_reload_refreshes_every_box_before_publishing() {
        let _guard = script_guard();
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "b.sh", "echo opened");
        write_script(dir.path(), "a.sh", "echo closed");
        write_script(dir.path(), ".hidden", "echo opened");
        write_plain(dir.path(), "readme.txt", "hello");
        let (mut app, indicator) = app(dir.path());

        app.reload();

        assert_eq!(
            app.list_boxes(),
            vec![view("a.sh", BoxStatus::Closed), view("b.sh", BoxStatus::Opened)]
        );
        assert_eq!(app.combined_status(), BoxStatus::Opened);
        // Одна публикация, уже с опрошенными боксами
        let published = indicator.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].combined, BoxStatus::Opened);
        assert_eq!(published[0].boxes, app.list_boxes());
        assert!(indicator.errors().is_empty());
    }

    #[test]
    fn test_reload_replaces_previous_set() {
        let _guard = script_guard();
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "old", "echo opened");
        let (mut app, _indicator) = app(dir.path());
        app.reload();
        assert_eq!(app.list_boxes(), vec![view("old", BoxStatus::Opened)]);

        fs::remove_file(dir.path().join("old")).unwrap();
        write_script(dir.path(), "new", "echo bogus");
        app.reload();
        assert_eq!(app.list_boxes(), vec![view("new", BoxStatus::Error)]);
        assert_eq!(app.combined_status(), BoxStatus::Error);
    }

    #[test]
    fn test_failed_reload_keeps_previous_state() {
        let _guard = script_guard();
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("loot");
        fs::create_dir(&dir).unwrap();
        write_script(&dir, "vault", "echo opened");
        let (mut app, indicator) = app(&dir);
        app.reload();
        let before = app.list_boxes();

        fs::remove_dir_all(&dir).unwrap();
        app.reload();

        assert_eq!(app.list_boxes(), before);
        assert_eq!(app.combined_status(), BoxStatus::Opened);
        assert_eq!(indicator.errors().len(), 1);
        let published = indicator.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[1].combined, BoxStatus::Opened);
        assert_eq!(published[1].boxes, before);
    }

    #[test]
    fn test_activate_opens_and_closes() {
        let _guard = script_guard();
        let dir = tempfile::tempdir().unwrap();
        write_stateful_script(dir.path(), "vault", "closed");
        let (mut app, indicator) = app(dir.path());
        app.reload();
        assert_eq!(app.combined_status(), BoxStatus::Closed);

        app.activate_box("vault");
        assert_eq!(app.list_boxes(), vec![view("vault", BoxStatus::Opened)]);
        assert_eq!(indicator.last().unwrap().combined, BoxStatus::Opened);

        app.activate_box("vault");
        assert_eq!(app.list_boxes(), vec![view("vault", BoxStatus::Closed)]);
        assert_eq!(indicator.last().unwrap().combined, BoxStatus::Closed);
        assert!(indicator.errors().is_empty());
    }

    #[test]
    fn test_failed_open_reports_once() {
        let _guard = script_guard();
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "vault", "[ \"$1\" = status ] && echo closed && exit 0\nexit 1");
        let (mut app, indicator) = app(dir.path());
        app.reload();

        app.activate_box("vault");

        assert_eq!(app.list_boxes(), vec![view("vault", BoxStatus::Error)]);
        assert_eq!(app.combined_status(), BoxStatus::Error);
        let errors = indicator.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("vault"));

        // Из Error активация только переопрашивает и молчит
        app.activate_box("vault");
        assert_eq!(app.list_boxes(), vec![view("vault", BoxStatus::Closed)]);
        assert_eq!(indicator.errors().len(), 1);
    }

    #[test]
    fn test_failed_close_reports_once() {
        let _guard = script_guard();
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "vault", "[ \"$1\" = status ] && echo opened && exit 0\nexit 1");
        let (mut app, indicator) = app(dir.path());
        app.reload();
        assert_eq!(app.list_boxes(), vec![view("vault", BoxStatus::Opened)]);

        // Открытый бокс при активации закрывается, и close падает
        app.activate_box("vault");

        assert_eq!(app.list_boxes(), vec![view("vault", BoxStatus::Error)]);
        assert_eq!(app.combined_status(), BoxStatus::Error);
        let errors = indicator.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("vault"));
        let last = indicator.last().unwrap();
        assert_eq!(last.combined, BoxStatus::Error);
        assert_eq!(last.boxes, vec![view("vault", BoxStatus::Error)]);
    }

    #[test]
    fn test_refresh_twice_is_stable() {
        let _guard = script_guard();
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "broken", "exit 3");
        let (mut app, indicator) = app(dir.path());
        app.reload();

        app.refresh_box("broken");
        let first = app.list_boxes();
        app.refresh_box("broken");

        assert_eq!(app.list_boxes(), first);
        assert_eq!(first, vec![view("broken", BoxStatus::Error)]);
        assert!(indicator.errors().is_empty());
    }

    #[test]
    fn test_unknown_box_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, indicator) = app(dir.path());

        app.activate_box("ghost");
        app.refresh_box("ghost");

        assert_eq!(indicator.errors().len(), 2);
        assert!(indicator.errors().iter().all(|e| e.contains("ghost")));
        assert!(indicator.published().is_empty());
    }

    #[test]
    fn test_run_processes_commands_in_order() {
        let _guard = script_guard();
        let dir = tempfile::tempdir().unwrap();
        write_stateful_script(dir.path(), "vault", "closed");
        let (app, indicator) = app(dir.path());

        let (tx, rx) = mpsc::channel(8);
        tx.try_send(AppCommand::Reload).unwrap();
        tx.try_send(AppCommand::Activate("vault".to_string())).unwrap();
        tx.try_send(AppCommand::List).unwrap();
        tx.try_send(AppCommand::Quit).unwrap();
        tx.try_send(AppCommand::Reload).unwrap();

        let app = app.run(rx);

        assert!(!app.is_running());
        let combined: Vec<_> = indicator.published().iter().map(|p| p.combined).collect();
        // Reload, Activate, List; Reload после Quit не выполняется
        assert_eq!(combined, vec![BoxStatus::Closed, BoxStatus::Opened, BoxStatus::Opened]);
    }

    #[test]
    fn test_run_stops_when_senders_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _indicator) = app(dir.path());
        let (tx, rx) = mpsc::channel(1);
        drop(tx);

        let app = app.run(rx);
        assert!(app.is_running());
    }
}
