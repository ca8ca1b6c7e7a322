//! Main application: terminal lifecycle, event loop, key routing
//!
//! One wizard, one store, one screen per wizard step. Spawned tasks
//! report back over the event channel; nothing blocks the draw loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::capture::CameraCapture;
use crate::config::{Config, StorageBackend};
use crate::pdf::generate_report_pdf;
use crate::report::{AutosaveScheduler, Wizard, WizardStep};
use crate::store::{
    Database, LocalReportStore, PreferenceStore, RemoteReportStore, ReportStore,
};
use crate::ui::components::{
    render_key_hints, ConfirmContext, ConfirmDialogState, DamageFocus, DamageLogState,
    DashboardState, DriverSignatureState, ErrorDialogState, PhotoTarget, ReportViewState,
    ScanDocumentState, ScanFocus, StatusBar,
};
use crate::ui::events::AppEvent;
use crate::ui::theme;
use crate::util::paths::{captures_dir, exports_dir};

/// Main application state
pub struct App {
    config: Config,
    store: Option<Arc<dyn ReportStore>>,
    prefs: Option<PreferenceStore>,
    store_error: Option<String>,
    wizard: Wizard,
    autosave: AutosaveScheduler,
    camera: CameraCapture,
    dashboard: DashboardState,
    scan: ScanDocumentState,
    damage_log: DamageLogState,
    driver: DriverSignatureState,
    report_view: ReportViewState,
    confirm: ConfirmDialogState,
    error: ErrorDialogState,
    /// Transient note shown in the status bar
    note: Option<String>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut camera = CameraCapture::new(captures_dir());
        camera.activate();

        let mut app = Self {
            config,
            store: None,
            prefs: None,
            store_error: None,
            wizard: Wizard::new(),
            autosave: AutosaveScheduler::new(),
            camera,
            dashboard: DashboardState::default(),
            scan: ScanDocumentState::default(),
            damage_log: DamageLogState::default(),
            driver: DriverSignatureState::default(),
            report_view: ReportViewState::default(),
            confirm: ConfirmDialogState::default(),
            error: ErrorDialogState::default(),
            note: None,
            event_tx,
            event_rx,
            should_quit: false,
        };
        app.init_store();
        app
    }

    /// Open the configured backend. Failure lands on the retry screen.
    fn init_store(&mut self) {
        self.store_error = None;

        match Database::open_default() {
            Ok(db) => {
                let prefs = PreferenceStore::new(db.connection());
                theme::init_theme(&prefs);
                self.prefs = Some(prefs);

                match &self.config.backend {
                    StorageBackend::Local => {
                        self.store = Some(Arc::new(LocalReportStore::new(db.connection())));
                    }
                    StorageBackend::Remote {
                        base_url,
                        api_key,
                        table,
                    } => match RemoteReportStore::new(base_url, api_key, table) {
                        Ok(remote) => self.store = Some(Arc::new(remote)),
                        Err(e) => self.store_error = Some(e.to_string()),
                    },
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Database unavailable");
                self.store_error = Some(e.to_string());
            }
        }

        if self.store.is_some() {
            self.reload_reports();
        }
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(16)) => {
                    if event::poll(Duration::from_millis(0))? {
                        match event::read()? {
                            Event::Key(key) => self.handle_key_event(key),
                            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                            _ => {}
                        }
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    self.handle_app_event(event);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    // --- Background tasks ---

    fn reload_reports(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        self.dashboard.loading = true;
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match store.get_all().await {
                Ok(reports) => AppEvent::ReportsLoaded(reports),
                Err(e) => AppEvent::ReportsLoadFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });
    }

    fn submit_report(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        // A pending draft save must not overwrite the submitted record
        self.autosave.cancel();

        let submitted = self.wizard.finalize();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let id = submitted.id.clone();
            let event = match store.save(&submitted).await {
                Ok(()) => AppEvent::SubmitCompleted(id),
                Err(e) => AppEvent::SubmitFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });
        self.note = Some("Bericht wird abgeschlossen…".to_string());
    }

    fn delete_report(&mut self, report_id: String) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match store.delete(&report_id).await {
                Ok(()) => AppEvent::ReportDeleted(report_id),
                Err(e) => AppEvent::DeleteFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });
    }

    fn export_pdf(&mut self, report: crate::report::InspectionReport) {
        let tx = self.event_tx.clone();
        let output_dir = exports_dir();
        tokio::task::spawn_blocking(move || {
            let event = match generate_report_pdf(&report, &output_dir) {
                Ok(path) => AppEvent::PdfExported(path),
                Err(e) => AppEvent::PdfFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });
        self.note = Some("PDF wird erstellt…".to_string());
    }

    /// Debounced draft persistence after any report mutation
    fn schedule_autosave(&mut self) {
        if !self.wizard.autosave_eligible() {
            return;
        }
        if let Some(store) = self.store.clone() {
            self.autosave.schedule(store, self.wizard.report.clone());
        }
    }

    // --- Event handling ---

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ReportsLoaded(reports) => {
                self.dashboard.set_reports(reports);
            }
            AppEvent::ReportsLoadFailed(msg) => {
                self.dashboard.loading = false;
                self.error.show("Fehler beim Laden", msg);
            }
            AppEvent::ReportDeleted(id) => {
                self.dashboard.remove(&id);
                self.note = Some(format!("Bericht {id} gelöscht"));
            }
            AppEvent::DeleteFailed(msg) => {
                self.error.show("Fehler beim Löschen", msg);
            }
            AppEvent::SubmitCompleted(id) => {
                self.wizard.reset();
                self.note = Some(format!("Bericht {id} abgeschlossen"));
                self.reload_reports();
            }
            AppEvent::SubmitFailed(msg) => {
                self.error.show("Fehler beim Abschließen", msg);
            }
            AppEvent::PdfExported(path) => {
                self.note = Some(format!("PDF gespeichert: {}", path.display()));
            }
            AppEvent::PdfFailed(msg) => {
                self.error.show("Fehler beim Erstellen des PDFs", msg);
            }
            AppEvent::Error(msg) => {
                self.error.show("Fehler", msg);
            }
            AppEvent::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn handle_key_event(&mut self, key: event::KeyEvent) {
        // Dialogs swallow input first
        if self.error.visible {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.error.hide();
            }
            return;
        }
        if self.confirm.visible {
            match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => self.confirm.toggle_selection(),
                KeyCode::Enter => {
                    if let Some(ConfirmContext::DeleteReport(id)) = self.confirm.take_confirmed() {
                        self.delete_report(id);
                    }
                }
                KeyCode::Esc => self.confirm.hide(),
                _ => {}
            }
            return;
        }
        if self.damage_log.picker_open {
            self.handle_picker_key(key);
            return;
        }

        // Store retry screen
        if self.store.is_none() {
            match key.code {
                KeyCode::Char('r') => self.init_store(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        // Global shortcuts
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('t') => {
                    theme::toggle_theme();
                    if let Some(prefs) = &self.prefs {
                        theme::persist_theme(prefs);
                    }
                    return;
                }
                _ => {}
            }
        }

        match self.wizard.step {
            WizardStep::Dashboard => self.handle_dashboard_key(key),
            WizardStep::ScanDocument => self.handle_scan_key(key),
            WizardStep::DamageLog => self.handle_damage_key(key),
            WizardStep::DriverSignature => self.handle_driver_key(key),
            WizardStep::Summary => self.handle_summary_key(key),
            WizardStep::ViewReport => self.handle_view_key(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: event::MouseEvent) {
        match self.wizard.step {
            WizardStep::DriverSignature => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    self.driver.mouse_down(mouse.column, mouse.row);
                }
                MouseEventKind::Drag(MouseButton::Left) => {
                    self.driver.mouse_drag(mouse.column, mouse.row);
                }
                MouseEventKind::Up(MouseButton::Left) => match self.driver.mouse_up() {
                    Ok(Some(data_url)) => {
                        self.wizard.set_signature(data_url);
                        self.schedule_autosave();
                    }
                    Ok(None) => {}
                    Err(e) => self.error.show("Fehler bei der Unterschrift", e.to_string()),
                },
                _ => {}
            },
            WizardStep::Summary | WizardStep::ViewReport => match mouse.kind {
                MouseEventKind::ScrollUp => self.report_view.scroll_up(3),
                MouseEventKind::ScrollDown => self.report_view.scroll_down(3),
                _ => {}
            },
            _ => {}
        }
    }

    // --- Step transitions ---

    fn advance_step(&mut self) {
        match self.wizard.advance() {
            Ok(_) => self.on_step_entered(),
            Err(e) => self.error.show("Hinweis", e.to_string()),
        }
    }

    fn back_step(&mut self) {
        self.wizard.back();
        self.on_step_entered();
    }

    fn on_step_entered(&mut self) {
        match self.wizard.step {
            WizardStep::Dashboard => self.reload_reports(),
            WizardStep::ScanDocument => {
                self.camera.activate();
                self.scan.refresh_files(&self.camera);
                self.scan.sync_from(self.wizard.report.document.as_ref());
                self.scan.focus = ScanFocus::Files;
            }
            WizardStep::DamageLog => {
                self.damage_log.clamp(&self.wizard.report);
                self.damage_log.sync_description(&self.wizard.report);
                self.damage_log.focus = DamageFocus::List;
            }
            WizardStep::DriverSignature => self.driver.sync_from(&self.wizard.report),
            WizardStep::Summary | WizardStep::ViewReport => self.report_view.reset(),
        }
    }

    // --- Per-screen key handlers ---

    fn handle_dashboard_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Up => self.dashboard.select_prev(),
            KeyCode::Down => self.dashboard.select_next(),
            KeyCode::Char('n') => {
                self.wizard.start_new();
                if self.wizard.report.employee_name.is_empty() {
                    if let Some(name) = &self.config.employee_name {
                        self.wizard.report.employee_name = name.clone();
                    }
                }
                self.on_step_entered();
            }
            KeyCode::Enter => {
                if let Some(report) = self.dashboard.selected_report().cloned() {
                    self.wizard.load_for_view(report);
                    self.on_step_entered();
                }
            }
            KeyCode::Char('e') => {
                if let Some(report) = self.dashboard.selected_report().cloned() {
                    match self.wizard.load_for_edit(report) {
                        Ok(()) => self.on_step_entered(),
                        Err(e) => self.error.show("Hinweis", e.to_string()),
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(report) = self.dashboard.selected_report() {
                    let id = report.id.clone();
                    self.confirm.show_delete(&id);
                }
            }
            KeyCode::Char('p') => {
                if let Some(report) = self.dashboard.selected_report().cloned() {
                    self.export_pdf(report);
                }
            }
            KeyCode::Char('r') => self.reload_reports(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_scan_key(&mut self, key: event::KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => return self.advance_step(),
                KeyCode::Char('b') => return self.back_step(),
                _ => {}
            }
        }
        match key.code {
            KeyCode::Tab => self.scan.focus_next(),
            KeyCode::BackTab => self.scan.focus_prev(),
            KeyCode::Esc => self.back_step(),
            _ => {}
        }

        if self.scan.focus == ScanFocus::Files {
            match key.code {
                KeyCode::Up => self.scan.select_prev_file(),
                KeyCode::Down => self.scan.select_next_file(),
                KeyCode::Char('r') => self.scan.refresh_files(&self.camera),
                KeyCode::Enter => {
                    if let Some(path) = self.scan.selected_file() {
                        match self.camera.capture_file(path) {
                            Ok(data_url) => {
                                self.wizard.capture_document(data_url);
                                self.scan.sync_from(self.wizard.report.document.as_ref());
                                self.schedule_autosave();
                            }
                            Err(e) => {
                                self.error.show("Fehler bei der Aufnahme", e.to_string())
                            }
                        }
                    }
                }
                KeyCode::Delete => {
                    self.wizard.clear_document();
                    self.scan.sync_from(None);
                    self.schedule_autosave();
                }
                _ => {}
            }
            return;
        }

        // Field editing; every change flows into the draft
        if self.edit_active_scan_input(key) {
            if let Some(document) = self.wizard.report.document.as_mut() {
                self.scan.write_back(document);
                self.schedule_autosave();
            }
        }
    }

    /// Apply an editing key to the focused scan input. Returns whether
    /// the value changed.
    fn edit_active_scan_input(&mut self, key: event::KeyEvent) -> bool {
        let Some(input) = self.scan.active_input_mut() else {
            return false;
        };
        apply_edit_key(input, key)
    }

    fn handle_damage_key(&mut self, key: event::KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => return self.advance_step(),
                KeyCode::Char('b') => return self.back_step(),
                _ => {}
            }
        }

        match self.damage_log.focus {
            DamageFocus::List => self.handle_damage_list_key(key),
            DamageFocus::Categories => self.handle_damage_category_key(key),
            DamageFocus::Description => self.handle_damage_description_key(key),
        }
    }

    fn handle_damage_list_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.damage_log.select_prev();
                self.damage_log.sync_description(&self.wizard.report);
            }
            KeyCode::Down => {
                self.damage_log.select_next(&self.wizard.report);
                self.damage_log.sync_description(&self.wizard.report);
            }
            KeyCode::Char('a') => {
                self.damage_log
                    .open_picker(PhotoTarget::NewDamage, self.camera.list_files());
            }
            KeyCode::Char('p') => {
                if let Some(damage) = self.damage_log.selected_damage(&self.wizard.report) {
                    let target = PhotoTarget::ExistingDamage(damage.id.clone());
                    self.damage_log.open_picker(target, self.camera.list_files());
                }
            }
            KeyCode::Char('s') => {
                if let Some(damage) = self.damage_log.selected_damage(&self.wizard.report) {
                    let (id, next) = (damage.id.clone(), damage.severity.next());
                    self.wizard.set_damage_severity(&id, next);
                    self.schedule_autosave();
                }
            }
            KeyCode::Char('c') => {
                if self.damage_log.selected_damage(&self.wizard.report).is_some() {
                    self.damage_log.focus = DamageFocus::Categories;
                }
            }
            KeyCode::Char('e') => {
                if self.damage_log.selected_damage(&self.wizard.report).is_some() {
                    self.damage_log.sync_description(&self.wizard.report);
                    self.damage_log.focus = DamageFocus::Description;
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(damage) = self.damage_log.selected_damage(&self.wizard.report) {
                    let id = damage.id.clone();
                    self.wizard.remove_damage(&id);
                    self.damage_log.clamp(&self.wizard.report);
                    self.damage_log.sync_description(&self.wizard.report);
                    self.schedule_autosave();
                }
            }
            KeyCode::Esc => self.back_step(),
            _ => {}
        }
    }

    fn handle_damage_category_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Up => self.damage_log.category_prev(),
            KeyCode::Down => self.damage_log.category_next(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(damage) = self.damage_log.selected_damage(&self.wizard.report) {
                    let id = damage.id.clone();
                    let category = crate::report::DAMAGE_TYPES[self.damage_log.category_index];
                    self.wizard.toggle_damage_category(&id, category);
                    self.schedule_autosave();
                }
            }
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Tab => {
                self.damage_log.focus = DamageFocus::List;
            }
            _ => {}
        }
    }

    fn handle_damage_description_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.damage_log.focus = DamageFocus::List;
                return;
            }
            _ => {}
        }
        if apply_edit_key(&mut self.damage_log.description, key) {
            if let Some(damage) = self.damage_log.selected_damage(&self.wizard.report) {
                let id = damage.id.clone();
                let value = self.damage_log.description.value().to_string();
                self.wizard.set_damage_description(&id, value);
                self.schedule_autosave();
            }
        }
    }

    fn handle_picker_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Up => self.damage_log.picker_prev(),
            KeyCode::Down => self.damage_log.picker_next(),
            KeyCode::Esc => self.damage_log.close_picker(),
            KeyCode::Enter => {
                let Some(path) = self.damage_log.picked_file() else {
                    self.damage_log.close_picker();
                    return;
                };
                match self.camera.capture_file(path) {
                    Ok(data_url) => {
                        let target = self.damage_log.picker_target.clone();
                        match target {
                            Some(PhotoTarget::ExistingDamage(id)) => {
                                self.wizard.capture_damage_photo(data_url, Some(&id));
                            }
                            _ => {
                                self.wizard.capture_damage_photo(data_url, None);
                                self.damage_log.selected =
                                    self.wizard.report.damages.len().saturating_sub(1);
                                self.damage_log.sync_description(&self.wizard.report);
                            }
                        }
                        self.schedule_autosave();
                    }
                    Err(e) => self.error.show("Fehler bei der Aufnahme", e.to_string()),
                }
                self.damage_log.close_picker();
            }
            _ => {}
        }
    }

    fn handle_driver_key(&mut self, key: event::KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => return self.advance_step(),
                KeyCode::Char('b') => return self.back_step(),
                KeyCode::Char('r') => {
                    let current = self
                        .wizard
                        .report
                        .driver
                        .as_ref()
                        .is_some_and(|d| d.under_reserve);
                    self.wizard.set_under_reserve(!current);
                    self.schedule_autosave();
                    return;
                }
                KeyCode::Char('l') => {
                    self.driver.clear_signature();
                    self.wizard.clear_signature();
                    self.schedule_autosave();
                    return;
                }
                _ => {}
            }
        }
        match key.code {
            KeyCode::Tab => {
                self.driver.focus_next();
                return;
            }
            KeyCode::BackTab => {
                self.driver.focus_prev();
                return;
            }
            KeyCode::Esc => {
                self.back_step();
                return;
            }
            _ => {}
        }

        if apply_edit_key(self.driver.active_input_mut(), key) {
            let driver = self.wizard.report.driver_mut();
            driver.name = self.driver.name.value().to_string();
            driver.license_plate = self.driver.plate.value().to_string();
            driver.company = self.driver.company.value().to_string();
            self.wizard.report.employee_name = self.driver.employee.value().to_string();
            self.schedule_autosave();
        }
    }

    fn handle_summary_key(&mut self, key: event::KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('b') {
            return self.back_step();
        }
        match key.code {
            KeyCode::Up => self.report_view.scroll_up(1),
            KeyCode::Down => self.report_view.scroll_down(1),
            KeyCode::PageUp => self.report_view.scroll_up(10),
            KeyCode::PageDown => self.report_view.scroll_down(10),
            KeyCode::Enter => self.submit_report(),
            KeyCode::Char('p') => self.export_pdf(self.wizard.report.clone()),
            KeyCode::Esc => self.back_step(),
            _ => {}
        }
    }

    fn handle_view_key(&mut self, key: event::KeyEvent) {
        match key.code {
            KeyCode::Up => self.report_view.scroll_up(1),
            KeyCode::Down => self.report_view.scroll_down(1),
            KeyCode::PageUp => self.report_view.scroll_up(10),
            KeyCode::PageDown => self.report_view.scroll_down(10),
            KeyCode::Char('p') => self.export_pdf(self.wizard.report.clone()),
            KeyCode::Esc | KeyCode::Char('q') => {
                self.wizard.reset();
                self.on_step_entered();
            }
            _ => {}
        }
    }

    // --- Drawing ---

    fn draw(&mut self, f: &mut Frame) {
        let size = f.area();
        f.render_widget(
            Block::default().style(Style::default().bg(theme::bg_base())),
            size,
        );

        if self.store.is_none() {
            self.draw_store_error(f);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(size);

        StatusBar::new(self.wizard.step, self.note.as_deref()).render(chunks[0], f.buffer_mut());

        match self.wizard.step {
            WizardStep::Dashboard => self.dashboard.render(chunks[1], f.buffer_mut()),
            WizardStep::ScanDocument => self.scan.render(
                chunks[1],
                f.buffer_mut(),
                self.wizard.report.document.as_ref(),
                self.camera.device_hint.as_deref(),
            ),
            WizardStep::DamageLog => {
                self.damage_log
                    .render(chunks[1], f.buffer_mut(), &self.wizard.report)
            }
            WizardStep::DriverSignature => {
                self.driver
                    .render(chunks[1], f.buffer_mut(), &self.wizard.report)
            }
            WizardStep::Summary | WizardStep::ViewReport => {
                self.report_view
                    .render(chunks[1], f.buffer_mut(), &self.wizard.report)
            }
        }

        render_key_hints(chunks[2], f.buffer_mut(), self.hints());

        if self.damage_log.picker_open {
            self.damage_log.render_picker(f, size);
        }
        if self.confirm.visible {
            self.confirm.render(f, size);
        }
        if self.error.visible {
            self.error.render(f, size);
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self.wizard.step {
            WizardStep::Dashboard => &[
                ("n", "Neu"),
                ("Enter", "Anzeigen"),
                ("e", "Bearbeiten"),
                ("d", "Löschen"),
                ("p", "PDF"),
                ("Strg+T", "Thema"),
                ("q", "Beenden"),
            ],
            WizardStep::ScanDocument => &[
                ("Tab", "Feld"),
                ("Enter", "Aufnehmen"),
                ("Entf", "Verwerfen"),
                ("Strg+N", "Weiter"),
                ("Esc", "Zurück"),
            ],
            WizardStep::DamageLog => &[
                ("a", "Neuer Schaden"),
                ("p", "Foto"),
                ("s", "Schweregrad"),
                ("c", "Kategorien"),
                ("e", "Notiz"),
                ("x", "Entfernen"),
                ("Strg+N", "Weiter"),
            ],
            WizardStep::DriverSignature => &[
                ("Tab", "Feld"),
                ("Maus", "Unterschrift"),
                ("Strg+L", "Unterschrift löschen"),
                ("Strg+R", "Vorbehalt"),
                ("Strg+N", "Weiter"),
            ],
            WizardStep::Summary => &[
                ("Enter", "Abschließen"),
                ("p", "PDF"),
                ("Esc", "Zurück"),
            ],
            WizardStep::ViewReport => &[("p", "PDF"), ("Esc", "Zurück")],
        }
    }

    fn draw_store_error(&self, f: &mut Frame) {
        let size = f.area();
        let message = self
            .store_error
            .clone()
            .unwrap_or_else(|| "Unbekannter Fehler".to_string());

        let lines = vec![
            Line::raw(""),
            Line::styled(
                "Datenbank nicht verfügbar",
                Style::default()
                    .fg(theme::accent_error())
                    .add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::styled(message, Style::default().fg(theme::text_primary())),
            Line::raw(""),
            Line::styled(
                "[r] Erneut versuchen   [q] Beenden",
                Style::default().fg(theme::text_muted()),
            ),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, size);
    }
}

/// Shared editing keys for single-line inputs. Returns whether the
/// value changed.
fn apply_edit_key(
    input: &mut crate::ui::components::TextInputState,
    key: event::KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('a') => {
                input.move_start();
                return false;
            }
            KeyCode::Char('e') => {
                input.move_end();
                return false;
            }
            KeyCode::Char('u') => {
                input.delete_to_start();
                return true;
            }
            KeyCode::Char('k') => {
                input.delete_to_end();
                return true;
            }
            KeyCode::Char('w') => {
                input.delete_word();
                return true;
            }
            _ => return false,
        }
    }
    match key.code {
        KeyCode::Char(c) => {
            input.insert_char(c);
            true
        }
        KeyCode::Backspace => {
            input.delete_char();
            true
        }
        KeyCode::Delete => {
            input.delete_forward();
            true
        }
        KeyCode::Left => {
            input.move_left();
            false
        }
        KeyCode::Right => {
            input.move_right();
            false
        }
        KeyCode::Home => {
            input.move_start();
            false
        }
        KeyCode::End => {
            input.move_end();
            false
        }
        _ => false,
    }
}
