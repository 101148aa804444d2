//! Screen controller: runs commands against the application context.

use taskdesk_core::types::TaskId;
use taskdesk_core::{
    AppContext, Decision, Error, ErrorKind, Notice, Redirect, Route, TaskListView, TaskScope,
};

use crate::TRACING_TARGET_SCREEN;
use crate::commands::{Command, CreateArgs, FilterArgs, UpdateArgs};
use crate::render;

/// What a command showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Route on screen after the command.
    pub route: Route,
    /// Rendered screen text.
    pub text: String,
    /// Whether the command failed.
    pub failed: bool,
}

impl Outcome {
    fn shown(route: Route, text: impl Into<String>) -> Self {
        Self {
            route,
            text: text.into(),
            failed: false,
        }
    }

    fn failed(route: Route, text: impl Into<String>) -> Self {
        Self {
            route,
            text: text.into(),
            failed: true,
        }
    }

    fn prepend(mut self, line: impl AsRef<str>) -> Self {
        self.text = format!("{}\n{}", line.as_ref(), self.text);
        self
    }
}

/// The screens of a single client session.
///
/// Both task lists are created lazily and kept between commands, so a filter
/// change re-renders the last fetched collection without another request.
#[derive(Debug)]
pub struct Screen {
    context: AppContext,
    all: Option<TaskListView>,
    mine: Option<TaskListView>,
    current: Route,
}

impl Screen {
    /// Creates the controller, starting on the task list when a session exists.
    pub fn new(context: AppContext) -> Self {
        let current = if context.identity().is_some() {
            Route::Tasks
        } else {
            Route::Login
        };

        Self {
            context,
            all: None,
            mine: None,
            current,
        }
    }

    /// Returns the application context.
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Returns the route currently on screen.
    pub fn current(&self) -> Route {
        self.current
    }

    /// Runs a single command.
    pub async fn run(&mut self, command: Command) -> Outcome {
        tracing::debug!(
            target: TRACING_TARGET_SCREEN,
            from = %self.current,
            to = %command.route(),
            "Running command"
        );

        let outcome = match command {
            Command::Login { username, password } => self.login(username, password).await,
            Command::Logout => self.logout(),
            Command::Whoami => self.whoami(),
            Command::Tasks(filters) => self.list(TaskScope::All, Some(&filters)).await,
            Command::Mine(filters) => self.list(TaskScope::Mine, Some(&filters)).await,
            Command::Filter(filters) => self.filter(&filters).await,
            Command::Show { id } => self.show(id).await,
            Command::Create(args) => self.create(args).await,
            Command::Update(args) => self.update(args).await,
            Command::Delete { id } => self.delete(id).await,
            Command::Open { path } => self.open(&path).await,
            Command::Shell => Outcome::shown(self.current, "Already in the interactive shell."),
        };

        // Leaving the login screen dismisses the recorded session error.
        if outcome.route != Route::Login && self.context.session().last_error().is_some() {
            self.context.session().clear_error();
        }
        outcome
    }

    async fn login(&mut self, username: String, password: String) -> Outcome {
        match self.context.session().login(username, password).await {
            Ok(identity) => {
                self.invalidate();
                self.list(TaskScope::All, None)
                    .await
                    .prepend(render::identity(&identity))
            }
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET_SCREEN,
                    kind = error.kind_str(),
                    "Sign in rejected"
                );
                self.current = Route::Login;
                Outcome::failed(Route::Login, self.login_text(None))
            }
        }
    }

    fn logout(&mut self) -> Outcome {
        self.context.session().logout();
        self.invalidate();
        self.current = Route::Login;
        Outcome::shown(
            Route::Login,
            format!("{}\nSigned out.", render::heading(Route::Login)),
        )
    }

    fn whoami(&mut self) -> Outcome {
        match self.context.identity() {
            Some(identity) => Outcome::shown(self.current, render::identity(&identity)),
            None => self.redirected(Redirect::Login),
        }
    }

    async fn list(&mut self, scope: TaskScope, filters: Option<&FilterArgs>) -> Outcome {
        if let Some(filters) = filters
            && !filters.is_empty()
        {
            self.context.filters().set_filters(filters.criteria());
        }

        match self.view_mut(scope).load().await {
            Ok(Decision::Allow) => {
                self.current = scope.route();
                self.render_list(scope)
            }
            Ok(Decision::Redirect(redirect)) => self.redirected(redirect),
            Err(error) if is_session_error(&error) => self.fail(&error),
            Err(_) => {
                self.current = scope.route();
                let mut outcome = self.render_list(scope);
                outcome.failed = true;
                outcome
            }
        }
    }

    async fn filter(&mut self, filters: &FilterArgs) -> Outcome {
        self.context.filters().set_filters(filters.criteria());

        let scope = match self.current {
            Route::MyTasks => TaskScope::Mine,
            _ => TaskScope::All,
        };
        if self.context.identity().is_some() && self.view(scope).is_some() {
            self.current = scope.route();
            self.render_list(scope)
        } else {
            self.list(scope, None).await
        }
    }

    async fn show(&mut self, id: TaskId) -> Outcome {
        let route = Route::ViewTask(id);
        if let Some(redirect) = self.enter(route) {
            return redirect;
        }

        match self.context.view_task(id).await {
            Ok(task) => Outcome::shown(
                route,
                format!("{}\n{}", render::heading(route), render::task_detail(&task)),
            ),
            Err(error) => self.fail(&error),
        }
    }

    async fn create(&mut self, args: CreateArgs) -> Outcome {
        if let Some(redirect) = self.enter(Route::CreateTask) {
            return redirect;
        }

        let today = jiff::Zoned::now().date();
        let task = args.into_new_task(today);
        match self.context.create_task(&task).await {
            Ok(created) => {
                self.invalidate();
                self.current = Route::ViewTask(created.id);
                Outcome::shown(
                    self.current,
                    format!(
                        "Created task #{}\n{}",
                        created.id,
                        render::task_detail(&created)
                    ),
                )
            }
            Err(error) => self.fail(&error),
        }
    }

    async fn update(&mut self, args: UpdateArgs) -> Outcome {
        let route = Route::UpdateTask(args.id);
        if let Some(redirect) = self.enter(route) {
            return redirect;
        }

        let patch = args.patch();
        if patch.is_empty() {
            return self.fail(&ErrorKind::Validation.with_message("Nothing to update"));
        }

        let current = match self.context.view_task(args.id).await {
            Ok(task) => task,
            Err(error) => return self.fail(&error),
        };
        if let Err(error) = patch.validate_against(&current) {
            return self.fail(&error);
        }

        match self.context.update_task(args.id, &patch).await {
            Ok(updated) => {
                self.invalidate();
                self.current = Route::ViewTask(updated.id);
                Outcome::shown(
                    self.current,
                    format!(
                        "Updated task #{}\n{}",
                        updated.id,
                        render::task_detail(&updated)
                    ),
                )
            }
            Err(error) => self.fail(&error),
        }
    }

    async fn delete(&mut self, id: TaskId) -> Outcome {
        let scope = match self.current {
            Route::MyTasks => TaskScope::Mine,
            _ => TaskScope::All,
        };

        let loaded = self.view(scope).is_some();
        match self.view_mut(scope).delete(id).await {
            // Nothing fetched yet, so show the list as the server now has it.
            Ok(()) if !loaded => self
                .list(scope, None)
                .await
                .prepend(format!("Deleted task #{id}")),
            Ok(()) => {
                self.current = scope.route();
                self.render_list(scope).prepend(format!("Deleted task #{id}"))
            }
            Err(error) if is_session_error(&error) => self.fail(&error),
            Err(error) if error.kind == ErrorKind::AuthorizationDenied => self.fail(&error),
            Err(error) => {
                self.current = scope.route();
                let mut outcome = self.render_list(scope);
                if self.view(scope).and_then(TaskListView::notice).is_none() {
                    outcome = outcome.prepend(format!("! {}", error.user_message()));
                }
                outcome.failed = true;
                outcome
            }
        }
    }

    async fn open(&mut self, path: &str) -> Outcome {
        let route = Route::parse(path);
        if let Some(redirect) = self.enter(route) {
            return redirect;
        }

        match route {
            Route::Tasks => self.list(TaskScope::All, None).await,
            Route::MyTasks => self.list(TaskScope::Mine, None).await,
            Route::ViewTask(id) => self.show(id).await,
            Route::UpdateTask(id) => {
                let outcome = self.show(id).await;
                if outcome.failed {
                    return outcome;
                }
                self.current = route;
                Outcome::shown(
                    route,
                    format!("{}\nChange fields with `update {id} --status <status> ...`", outcome.text),
                )
            }
            Route::CreateTask => Outcome::shown(
                route,
                format!(
                    "{}\nCreate a task with `create <title> [--due YYYY-MM-DD] ...`",
                    render::heading(route)
                ),
            ),
            Route::Login => {
                let hint = match self.context.identity() {
                    Some(identity) => render::identity(&identity),
                    None => "Sign in with `login <email> --password <password>`".to_owned(),
                };
                Outcome::shown(route, self.login_text(Some(&hint)))
            }
            Route::AccessDenied => Outcome::shown(route, access_denied_text()),
        }
    }

    /// Evaluates a navigation, returning the redirect screen if it is denied.
    fn enter(&mut self, route: Route) -> Option<Outcome> {
        match self.context.navigate(route) {
            Decision::Allow => {
                self.current = route;
                None
            }
            Decision::Redirect(redirect) => Some(self.redirected(redirect)),
        }
    }

    fn redirected(&mut self, redirect: Redirect) -> Outcome {
        let route = redirect.route();
        self.current = route;
        match redirect {
            Redirect::Login => {
                self.invalidate();
                Outcome::shown(route, self.login_text(Some("Please sign in to continue.")))
            }
            Redirect::AccessDenied => Outcome::shown(route, access_denied_text()),
        }
    }

    fn fail(&mut self, error: &Error) -> Outcome {
        tracing::debug!(
            target: TRACING_TARGET_SCREEN,
            kind = error.kind_str(),
            error = %error,
            "Command failed"
        );

        let mut outcome = match error.kind {
            ErrorKind::AuthenticationFailure => self.redirected(Redirect::Login),
            ErrorKind::Unauthorized if self.context.session().last_error().is_some() => {
                self.redirected(Redirect::Login)
            }
            ErrorKind::Unauthorized => self
                .redirected(Redirect::Login)
                .prepend(format!("! {}", error.user_message())),
            ErrorKind::AuthorizationDenied => self.redirected(Redirect::AccessDenied),
            _ => Outcome::failed(self.current, format!("! {}", error.user_message())),
        };
        outcome.failed = true;
        outcome
    }

    /// Renders the login screen with the pending session error, if any.
    fn login_text(&self, hint: Option<&str>) -> String {
        let mut text = render::heading(Route::Login);
        if let Some(notice) = self
            .context
            .session()
            .last_error()
            .as_ref()
            .and_then(Notice::from_error)
        {
            text.push('\n');
            text.push_str(&render::notice(&notice));
        }
        if let Some(hint) = hint {
            text.push('\n');
            text.push_str(hint);
        }
        text
    }

    fn render_list(&self, scope: TaskScope) -> Outcome {
        let route = scope.route();
        let mut text = render::heading(route);
        text.push('\n');
        text.push_str(&render::filters(&self.context.filters().filters()));

        if let Some(view) = self.view(scope) {
            if let Some(notice) = view.notice() {
                text.push('\n');
                text.push_str(&render::notice(notice));
            }
            text.push('\n');
            text.push_str(&render::task_table(&view.visible()));
        }

        Outcome::shown(route, text)
    }

    fn view(&self, scope: TaskScope) -> Option<&TaskListView> {
        match scope {
            TaskScope::All => self.all.as_ref(),
            TaskScope::Mine => self.mine.as_ref(),
        }
    }

    fn view_mut(&mut self, scope: TaskScope) -> &mut TaskListView {
        let slot = match scope {
            TaskScope::All => &mut self.all,
            TaskScope::Mine => &mut self.mine,
        };
        slot.get_or_insert_with(|| self.context.list_view(scope))
    }

    fn invalidate(&mut self) {
        self.all = None;
        self.mine = None;
    }
}

fn is_session_error(error: &Error) -> bool {
    matches!(
        error.kind,
        ErrorKind::AuthenticationFailure | ErrorKind::Unauthorized
    )
}

fn access_denied_text() -> String {
    format!(
        "{}\nYou do not have permission to view this page.",
        render::heading(Route::AccessDenied)
    )
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use taskdesk_core::mock::{MockAuthProvider, MockTaskProvider};
    use taskdesk_core::session::MemoryStorage;
    use taskdesk_core::types::{Credential, Identity, Role, Task, TaskPriority, TaskStatus};
    use taskdesk_core::{AuthService, FilterState, LoginResponse, SessionStore, TaskService};

    use super::*;

    fn task(id: TaskId, status: TaskStatus, assignee: u64) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: None,
            status,
            priority: TaskPriority::Medium,
            start_date: date(2025, 1, 1),
            due_date: Some(date(2025, 1, 10)),
            assignee_id: Some(assignee),
        }
    }

    fn screen() -> (Screen, MockTaskProvider) {
        let auth = MockAuthProvider::new()
            .with_account(
                "member@x.com",
                "p",
                LoginResponse::new(
                    Credential::new("t-member"),
                    Identity::new(1, "member@x.com").with_role(Role::named("Member")),
                ),
            )
            .with_account(
                "admin@x.com",
                "p",
                LoginResponse::new(
                    Credential::new("t-admin"),
                    Identity::new(2, "admin@x.com").with_role(Role::named("Administrators")),
                ),
            );
        let provider = MockTaskProvider::with_tasks([
            task(1, TaskStatus::Done, 1),
            task(2, TaskStatus::ToDo, 2),
            task(3, TaskStatus::Done, 2),
        ]);
        let session = SessionStore::new(AuthService::new(auth), MemoryStorage::new());
        let context = AppContext::new(
            session,
            FilterState::new(),
            TaskService::new(provider.clone()),
        );
        (Screen::new(context), provider)
    }

    fn login(user: &str, password: &str) -> Command {
        Command::Login {
            username: user.into(),
            password: password.into(),
        }
    }

    fn filters(status: &str) -> FilterArgs {
        FilterArgs {
            status: Some(status.into()),
            priority: None,
        }
    }

    #[tokio::test]
    async fn test_protected_screens_redirect_to_login() {
        let (mut screen, provider) = screen();

        let outcome = screen.run(Command::Tasks(FilterArgs::default())).await;

        assert_eq!(outcome.route, Route::Login);
        assert!(outcome.text.contains("Please sign in"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_login_lands_on_task_list() {
        let (mut screen, _provider) = screen();

        let outcome = screen.run(login("member@x.com", "p")).await;

        assert!(!outcome.failed);
        assert_eq!(outcome.route, Route::Tasks);
        assert!(outcome.text.starts_with("Signed in as member@x.com"));
        assert!(outcome.text.contains("Task 3"));
    }

    #[tokio::test]
    async fn test_failed_login_stays_on_login() {
        let (mut screen, _provider) = screen();

        let outcome = screen.run(login("member@x.com", "wrong")).await;

        assert!(outcome.failed);
        assert_eq!(outcome.route, Route::Login);
        assert!(screen.context().identity().is_none());
    }

    #[tokio::test]
    async fn test_filter_rerenders_without_refetch() {
        let (mut screen, provider) = screen();
        screen.run(login("member@x.com", "p")).await;
        let calls = provider.calls();

        let outcome = screen.run(Command::Filter(filters("to_do"))).await;

        assert_eq!(provider.calls(), calls);
        assert!(outcome.text.contains("Task 2"));
        assert!(!outcome.text.contains("Task 1"));
        assert!(outcome.text.contains("status=to_do"));
    }

    #[tokio::test]
    async fn test_filters_are_shared_between_lists() {
        let (mut screen, _provider) = screen();
        screen.run(login("member@x.com", "p")).await;
        screen.run(Command::Tasks(filters("DONE"))).await;

        let outcome = screen.run(Command::Mine(FilterArgs::default())).await;

        assert_eq!(outcome.route, Route::MyTasks);
        assert!(outcome.text.contains("Task 1"));
        assert!(!outcome.text.contains("Task 3"));
    }

    #[tokio::test]
    async fn test_member_delete_is_denied() {
        let (mut screen, provider) = screen();
        screen.run(login("member@x.com", "p")).await;

        let outcome = screen.run(Command::Delete { id: 1 }).await;

        assert!(outcome.failed);
        assert_eq!(outcome.route, Route::AccessDenied);
        assert_eq!(provider.tasks().len(), 3);
    }

    #[tokio::test]
    async fn test_admin_delete_removes_task() {
        let (mut screen, provider) = screen();
        screen.run(login("admin@x.com", "p")).await;

        let outcome = screen.run(Command::Delete { id: 1 }).await;

        assert!(!outcome.failed);
        assert!(outcome.text.starts_with("Deleted task #1"));
        assert!(!outcome.text.lines().any(|line| line.ends_with("Task 1")));
        assert_eq!(provider.tasks().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_before_any_list_fetches_it() {
        let (mut screen, provider) = screen();
        screen
            .context()
            .session()
            .login("admin@x.com", "p")
            .await
            .unwrap();
        let mut screen = Screen::new(screen.context().clone());

        let outcome = screen.run(Command::Delete { id: 1 }).await;

        assert!(!outcome.failed);
        assert_eq!(outcome.route, Route::Tasks);
        assert!(outcome.text.starts_with("Deleted task #1"));
        assert!(outcome.text.contains("Task 2"));
        assert!(outcome.text.contains("Task 3"));
        assert!(!outcome.text.lines().any(|line| line.ends_with("Task 1")));
        assert_eq!(provider.tasks().len(), 2);
    }

    #[tokio::test]
    async fn test_login_error_shown_until_leaving_login() {
        let (mut screen, _provider) = screen();
        screen.run(login("member@x.com", "p")).await;

        let outcome = screen.run(login("member@x.com", "wrong")).await;
        let error = screen.context().session().last_error().unwrap();
        let notice = Notice::from_error(&error).unwrap();

        assert_eq!(outcome.route, Route::Login);
        assert!(outcome.text.lines().any(|line| line == render::notice(&notice)));

        let outcome = screen
            .run(Command::Open {
                path: "/login".into(),
            })
            .await;
        assert!(outcome.text.contains(&notice.message));
        assert!(screen.context().session().last_error().is_some());

        let outcome = screen.run(Command::Tasks(FilterArgs::default())).await;
        assert_eq!(outcome.route, Route::Tasks);
        assert!(!outcome.text.contains(&notice.message));
        assert!(screen.context().session().last_error().is_none());
    }

    #[tokio::test]
    async fn test_unknown_path_shows_access_denied() {
        let (mut screen, _provider) = screen();
        screen.run(login("member@x.com", "p")).await;

        let outcome = screen
            .run(Command::Open {
                path: "/settings".into(),
            })
            .await;

        assert_eq!(outcome.route, Route::AccessDenied);
    }

    #[tokio::test]
    async fn test_update_rejects_due_before_start() {
        let (mut screen, provider) = screen();
        screen.run(login("member@x.com", "p")).await;

        let args = UpdateArgs {
            id: 2,
            title: None,
            description: None,
            status: None,
            priority: None,
            start: None,
            due: Some(date(2024, 12, 1)),
            assignee: None,
        };
        let outcome = screen.run(Command::Update(args)).await;

        assert!(outcome.failed);
        assert_eq!(provider.tasks()[1].due_date, Some(date(2025, 1, 10)));
    }

    #[tokio::test]
    async fn test_logout_clears_lists() {
        let (mut screen, provider) = screen();
        screen.run(login("member@x.com", "p")).await;
        screen.run(Command::Logout).await;
        let calls = provider.calls();

        let outcome = screen.run(Command::Filter(FilterArgs::default())).await;

        assert_eq!(outcome.route, Route::Login);
        assert_eq!(provider.calls(), calls);
    }
}
