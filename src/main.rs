use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use catalog_admin::api::{CrudApi, HttpApi};
use catalog_admin::config::{apply_list_args, Cli, Command, PageKind};
use catalog_admin::controller::PageController;
use catalog_admin::handlers::{
    handle_confirm_delete, handle_form_mode, handle_normal_mode, handle_token_input, KeyAction,
    TokenInput, WorkspaceOp,
};
use catalog_admin::logging::init_tracing;
use catalog_admin::notify::Severity;
use catalog_admin::query::{QueryParam, SortOrder};
use catalog_admin::render::{
    build_page_title, build_tab_bar, format_plain_table, render_form, render_status_bar,
    render_table,
};
use catalog_admin::resource::{AlbumResource, MusicResource, Resource};
use catalog_admin::session::TokenSession;
use catalog_admin::state::AppMode;
use catalog_admin::table::sort_keys;
use catalog_admin::workspace::{ConsolePage, Workspace};

/// Initialize the terminal for TUI rendering.
/// Enables raw mode, enters alternate screen, and creates a Terminal instance.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
/// Disables raw mode and leaves alternate screen.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn build_page<R: Resource>(api: &Arc<HttpApi>, session: &Arc<TokenSession>) -> PageController<R>
where
    HttpApi: CrudApi<R>,
{
    PageController::new(api.clone(), api.clone(), session.clone())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let session = Arc::new(TokenSession::new(cli.token.clone()));
    let api = Arc::new(HttpApi::new(&cli.api_url, cli.timeout(), session.clone()));
    tracing::info!(api_url = %cli.api_url, "starting");

    match &cli.command {
        Some(Command::List { table, sorts, page }) => match table {
            PageKind::Music => {
                run_list::<MusicResource>(build_page(&api, &session), sorts, *page)
            }
            PageKind::Albums => {
                run_list::<AlbumResource>(build_page(&api, &session), sorts, *page)
            }
        },
        None => match run_tui(api, session) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Fetch one page, print it and exit.
fn run_list<R: Resource>(
    controller: PageController<R>,
    sorts: &[(String, SortOrder)],
    page: u32,
) -> ExitCode {
    let mut query = QueryParam::new(&sort_keys(R::COLUMNS));
    let unknown = apply_list_args(&mut query, sorts, page);
    for key in &unknown {
        eprintln!("Warning: '{}' is not a sortable column of {}", key, R::TITLE);
    }

    let mut controller = controller.with_query(query);
    if !controller.is_signed_in() {
        eprintln!("Error: not signed in; pass --token or set CATADM_TOKEN");
        return ExitCode::FAILURE;
    }
    controller.fetch();
    controller.settle();

    if let Some(toast) = controller
        .toasts()
        .last()
        .filter(|t| t.severity == Severity::Error)
    {
        eprintln!("Error: {}", toast.message);
        return ExitCode::FAILURE;
    }

    let data = controller.render_data(Instant::now());
    print!("{}", format_plain_table(&data));
    ExitCode::SUCCESS
}

fn run_tui(api: Arc<HttpApi>, session: Arc<TokenSession>) -> io::Result<()> {
    let mut workspace = Workspace::new();
    workspace.add_tab(Box::new(build_page::<MusicResource>(&api, &session)));
    workspace.add_tab(Box::new(build_page::<AlbumResource>(&api, &session)));
    workspace.activate_all();

    // Set up panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, &mut workspace, &session);

    // Clear terminal before exit
    terminal.clear()?;
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    workspace: &mut Workspace,
    session: &TokenSession,
) -> io::Result<()> {
    let mut mode = AppMode::Normal;
    let mut input_buffer = String::new();

    loop {
        workspace.pump_all(Instant::now());

        let tab_bar = build_tab_bar(workspace);
        let tab_count = workspace.tab_count();
        let Some(tab) = workspace.active_tab_mut() else {
            return Ok(());
        };

        // Keep the mode in step with the detail view
        if mode == AppMode::Form && !tab.page.is_detail_open() {
            mode = AppMode::Normal;
        }

        let data = tab.page.render_data(Instant::now());
        terminal.draw(|frame| {
            let [main_area, status_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(3)])
                    .areas(frame.area());

            let title = build_page_title(&tab_bar, &data);
            render_table(
                frame,
                main_area,
                &data,
                title,
                tab.selected_col,
                &mut tab.table_state,
            );
            if mode == AppMode::Form {
                if let Some(detail) = &data.detail {
                    render_form(frame, main_area, detail);
                }
            }
            render_status_bar(frame, status_area, mode, &data, tab_count, &input_buffer);
        })?;

        // Poll with 100ms timeout so finished calls show up promptly
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match mode {
            AppMode::Normal => match handle_normal_mode(&key, tab, tab_count) {
                KeyAction::None => {}
                KeyAction::Quit => break,
                KeyAction::ModeChange(new_mode) => mode = new_mode,
                KeyAction::Workspace(op) => match op {
                    WorkspaceOp::NextTab => workspace.next_tab(),
                    WorkspaceOp::PrevTab => workspace.prev_tab(),
                    WorkspaceOp::SwitchTo(idx) => workspace.switch_to(idx),
                },
            },
            AppMode::Form => {
                if handle_form_mode(&key, tab) {
                    mode = AppMode::Normal;
                }
            }
            AppMode::ConfirmDelete(id) => {
                handle_confirm_delete(&key, tab, id);
                mode = AppMode::Normal;
            }
            AppMode::TokenInput => match handle_token_input(&key, &mut input_buffer) {
                TokenInput::Pending => {}
                TokenInput::Cancelled => mode = AppMode::Normal,
                TokenInput::Submitted(token) => {
                    let event = if token.is_empty() {
                        session.sign_out()
                    } else {
                        session.sign_in(token)
                    };
                    workspace.broadcast(event);
                    mode = AppMode::Normal;
                }
            },
        }
    }

    Ok(())
}
