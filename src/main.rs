use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
mod app;
mod config;
mod error;
mod events;
mod indicator;
mod model;
mod services;
#[cfg(test)]
mod test_support;
mod utils;

use app::App;
use config::Config;
use events::AppCommand;
use indicator::create_indicator;
use services::{create_dir_watcher, create_runner, ConsoleControl};
use utils::config_dir::{default_config_dir, ensure_config_dir};

const COMMAND_QUEUE_SIZE: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "loot")]
#[command(about = "Управление боксами через скрипты status/open/close")]
struct Args {
    /// Путь к файлу конфигурации (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Директория с боксами (по умолчанию $XDG_CONFIG_HOME/loot)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Режим сухого запуска (open/close не выполняются)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает конфигурацию)
    #[arg(long)]
    log_level: Option<String>,

    /// Загрузить боксы, показать состояние и выйти
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.config_dir {
        config.boxes.config_dir = Some(dir);
    }

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск Loot v{}", env!("CARGO_PKG_VERSION"));
    if args.dry_run {
        warn!("Режим сухого запуска - open/close отключены");
    }

    let indicator = create_indicator(&config)?;
    let config_dir = config
        .boxes
        .config_dir
        .clone()
        .unwrap_or_else(default_config_dir);

    // Без директории продолжать нечего: сообщаем и выходим
    if let Err(e) = ensure_config_dir(&config_dir) {
        indicator.show_error(&e.to_string());
        return Err(e).context("Не удалось подготовить директорию конфигурации");
    }

    let runner = create_runner(&config, args.dry_run);
    let mut app = App::new(config_dir.clone(), runner, indicator);
    info!("Боксы ищутся в {}", app.config_dir().display());

    if args.once {
        tokio::task::spawn_blocking(move || app.reload())
            .await
            .context("Перезагрузка прервана")?;
        return Ok(());
    }

    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE_SIZE);

    // Первая загрузка всегда идёт первой в очереди
    commands_tx
        .send(AppCommand::Reload)
        .await
        .context("Очередь команд закрыта до запуска")?;

    let watcher_handle = if config.watch.enabled {
        match create_dir_watcher(&config, config_dir, commands_tx.clone()) {
            Ok(watcher) => Some(tokio::spawn(async move {
                if let Err(e) = watcher.run().await {
                    error!("Ошибка в DirWatcher: {}", e);
                }
            })),
            Err(e) => {
                warn!("Отслеживание директории отключено: {}", e);
                None
            }
        }
    } else {
        info!("Отслеживание директории отключено в конфигурации");
        None
    };

    let console_tx = commands_tx.clone();
    std::thread::Builder::new()
        .name("loot-console".to_string())
        .spawn(move || {
            let console = ConsoleControl::new(std::io::stdin().lock(), console_tx);
            if let Err(e) = console.run() {
                error!("Ошибка чтения консоли: {}", e);
            }
        })
        .context("Не удалось запустить поток консоли")?;

    let signal_tx = commands_tx.clone();
    let signal_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
            Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
        }
        let _ = signal_tx.send(AppCommand::Quit).await;
    });
    drop(commands_tx);

    info!("Все сервисы запущены");

    // Все операции с боксами выполняются здесь, строго по одной
    let app = tokio::task::spawn_blocking(move || app.run(commands_rx))
        .await
        .context("Основной цикл прерван")?;

    info!("Завершение работы...");
    signal_handle.abort();
    if let Some(handle) = watcher_handle {
        handle.abort();
    }

    info!(
        "Loot завершил работу (боксов: {}, общее состояние: {})",
        app.list_boxes().len(),
        app.combined_status()
    );
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    // Логи в stderr, чтобы не смешиваться с выводом индикатора
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "pretty" => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}
