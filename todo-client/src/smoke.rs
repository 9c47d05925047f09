//! End-to-end smoke scenarios against a running server
//!
//! Each scenario records one [`Step`] per request, removes the todos it
//! created and returns a [`Report`]. Scenarios assume they are the only
//! writer while they run; the delete scenario compares totals.

use std::fmt;

use chrono::{Duration, Utc};
use shared::models::Patch;

use crate::{ClientError, ClientResult, HttpClient, Priority, Todo, TodoCreate, TodoQuery, TodoUpdate};

/// A runnable scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Create,
    Get,
    Update,
    Delete,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Create,
        Scenario::Get,
        Scenario::Update,
        Scenario::Delete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Create => "create",
            Scenario::Get => "get",
            Scenario::Update => "update",
            Scenario::Delete => "delete",
        }
    }

    pub async fn run(self, client: &HttpClient) -> Report {
        let mut run = Run::new(self.name());
        match self {
            Scenario::Create => create(client, &mut run).await,
            Scenario::Get => get(client, &mut run).await,
            Scenario::Update => update(client, &mut run).await,
            Scenario::Delete => delete(client, &mut run).await,
        }
        run.cleanup(client).await;
        run.report
    }
}

/// Outcome of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

/// Steps of one scenario, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub scenario: &'static str,
    pub steps: Vec<Step>,
}

impl Report {
    fn new(scenario: &'static str) -> Self {
        Self {
            scenario,
            steps: Vec::new(),
        }
    }

    pub fn passed(&self) -> usize {
        self.steps.iter().filter(|s| s.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.steps.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn record(&mut self, name: &str, passed: bool, detail: impl Into<String>) {
        let step = Step {
            name: name.to_string(),
            passed,
            detail: detail.into(),
        };
        if step.passed {
            tracing::debug!(scenario = self.scenario, step = %step.name, "step passed");
        } else {
            tracing::warn!(scenario = self.scenario, step = %step.name, detail = %step.detail, "step failed");
        }
        self.steps.push(step);
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.scenario)?;
        for step in &self.steps {
            let mark = if step.passed { "PASS" } else { "FAIL" };
            if step.detail.is_empty() {
                writeln!(f, "  [{mark}] {}", step.name)?;
            } else {
                writeln!(f, "  [{mark}] {}: {}", step.name, step.detail)?;
            }
        }
        write!(
            f,
            "  {} passed, {} failed",
            self.passed(),
            self.failed()
        )
    }
}

/// Report under construction plus the ids to remove afterwards
struct Run {
    report: Report,
    created: Vec<String>,
}

impl Run {
    fn new(scenario: &'static str) -> Self {
        Self {
            report: Report::new(scenario),
            created: Vec::new(),
        }
    }

    /// Record a request that should succeed and pass its value on
    fn ok<T>(&mut self, name: &str, result: ClientResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.report.record(name, true, "");
                Some(value)
            }
            Err(e) => {
                self.report.record(name, false, e.to_string());
                None
            }
        }
    }

    /// Record a request that should be refused in a specific way
    fn refused<T: fmt::Debug>(
        &mut self,
        name: &str,
        result: ClientResult<T>,
        expected: fn(&ClientError) -> bool,
    ) {
        match result {
            Err(e) if expected(&e) => self.report.record(name, true, e.to_string()),
            Err(e) => self.report.record(name, false, format!("unexpected error: {e}")),
            Ok(value) => self
                .report
                .record(name, false, format!("expected an error, got {value:?}")),
        }
    }

    fn check(&mut self, name: &str, passed: bool, detail: impl Into<String>) {
        let detail = if passed { String::new() } else { detail.into() };
        self.report.record(name, passed, detail);
    }

    async fn create(&mut self, client: &HttpClient, name: &str, body: &TodoCreate) -> Option<Todo> {
        let todo = self.ok(name, client.create_todo(body).await)?;
        self.created.push(todo.id.clone());
        Some(todo)
    }

    async fn cleanup(&mut self, client: &HttpClient) {
        for id in self.created.drain(..) {
            match client.delete_todo(&id).await {
                Ok(_) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => tracing::warn!(%id, "cleanup failed: {e}"),
            }
        }
    }

    /// Forget an id the scenario removed itself
    fn forget(&mut self, id: &str) {
        self.created.retain(|c| c != id);
    }
}

async fn create(client: &HttpClient, run: &mut Run) {
    let due = Utc::now() + Duration::days(7);
    let full = TodoCreate::new("Prepare quarterly report")
        .with_description("Collect numbers from every team")
        .with_priority("high")
        .with_due_date(due)
        .with_tags(["work", "reports"]);
    if let Some(todo) = run.create(client, "create with every field", &full).await {
        run.check(
            "fields echoed back",
            todo.title == "Prepare quarterly report"
                && todo.priority == Priority::High
                && todo.tags == ["work", "reports"]
                && todo.due_date.is_some(),
            format!("got {todo:?}"),
        );
        run.check(
            "timestamps set",
            todo.created_at == todo.updated_at,
            "createdAt and updatedAt differ on a fresh todo",
        );
    }

    if let Some(todo) = run
        .create(client, "create with title only", &TodoCreate::new("Buy milk"))
        .await
    {
        run.check(
            "defaults applied",
            todo.priority == Priority::Medium
                && todo.description.is_empty()
                && todo.tags.is_empty()
                && todo.due_date.is_none()
                && !todo.is_overdue,
            format!("got {todo:?}"),
        );
    }

    run.refused(
        "empty title rejected",
        client.create_todo(&TodoCreate::new("   ")).await,
        ClientError::is_validation,
    );
    run.refused(
        "invalid priority rejected",
        client
            .create_todo(&TodoCreate::new("Bad priority").with_priority("urgent"))
            .await,
        ClientError::is_validation,
    );
    run.refused(
        "overlong title rejected",
        client.create_todo(&TodoCreate::new("x".repeat(201))).await,
        ClientError::is_validation,
    );
}

async fn get(client: &HttpClient, run: &mut Run) {
    let mut seeded = Vec::new();
    for (title, priority) in [
        ("Fix production bug", "high"),
        ("Review pull request", "medium"),
        ("Water the plants", "low"),
    ] {
        let body = TodoCreate::new(title).with_priority(priority);
        if let Some(todo) = run.create(client, &format!("seed {priority}"), &body).await {
            seeded.push(todo);
        }
    }

    if let Some(all) = run.ok("list all", client.list_todos(&TodoQuery::default()).await) {
        let missing = seeded
            .iter()
            .filter(|s| !all.iter().any(|t| t.id == s.id))
            .count();
        run.check(
            "list contains seeded todos",
            missing == 0,
            format!("{missing} seeded todos missing"),
        );
        run.check(
            "default order is newest first",
            all.windows(2).all(|w| w[0].created_at >= w[1].created_at),
            "not sorted by -createdAt",
        );
    }

    for priority in ["high", "medium", "low"] {
        let query = TodoQuery {
            priority: Some(priority.to_string()),
            sort: None,
        };
        if let Some(todos) = run.ok(
            &format!("filter by {priority}"),
            client.list_todos(&query).await,
        ) {
            run.check(
                &format!("only {priority} returned"),
                !todos.is_empty() && todos.iter().all(|t| t.priority.as_str() == priority),
                format!("got {} todos with mixed priorities", todos.len()),
            );
        }
    }

    let ascending = TodoQuery {
        priority: None,
        sort: Some("createdAt".to_string()),
    };
    if let Some(todos) = run.ok("sort by createdAt", client.list_todos(&ascending).await) {
        run.check(
            "oldest first",
            todos.windows(2).all(|w| w[0].created_at <= w[1].created_at),
            "not sorted by createdAt",
        );
    }

    let high_newest = TodoQuery {
        priority: Some("high".to_string()),
        sort: Some("-createdAt".to_string()),
    };
    run.ok(
        "filter high, newest first",
        client.list_todos(&high_newest).await,
    );

    if let Some(first) = seeded.first() {
        if let Some(todo) = run.ok("get by id", client.get_todo(&first.id).await) {
            run.check("same todo returned", todo == *first, format!("got {todo:?}"));
        }
    }

    if let Some(stats) = run.ok("stats", client.stats().await) {
        run.check(
            "stats count seeded todos",
            stats.total >= seeded.len() as u64,
            format!("total {} below {}", stats.total, seeded.len()),
        );
    }

    run.refused(
        "unknown id is not found",
        client.get_todo("00000000000000000000000000000000").await,
        ClientError::is_not_found,
    );
    run.refused(
        "unknown sort field rejected",
        client
            .list_todos(&TodoQuery {
                priority: None,
                sort: Some("color".to_string()),
            })
            .await,
        ClientError::is_validation,
    );
}

async fn update(client: &HttpClient, run: &mut Run) {
    let body = TodoCreate::new("Draft release notes").with_priority("low");
    let Some(original) = run.create(client, "seed", &body).await else {
        return;
    };
    let id = original.id.as_str();

    let title = TodoUpdate {
        title: Patch::Value("Draft release notes v2".to_string()),
        ..Default::default()
    };
    if let Some(todo) = run.ok("update title", client.update_todo(id, &title).await) {
        run.check(
            "other fields unchanged",
            todo.priority == Priority::Low && todo.updated_at > original.updated_at,
            format!("got {todo:?}"),
        );
    }

    if let Some(todo) = run.ok("set priority high", client.set_priority(id, "high").await) {
        run.check(
            "priority is high",
            todo.priority == Priority::High,
            format!("got {}", todo.priority),
        );
    }

    let description = TodoUpdate {
        description: Patch::Value("Cover every merged change".to_string()),
        ..Default::default()
    };
    run.ok(
        "update description",
        client.update_todo(id, &description).await,
    );

    let due = Utc::now() + Duration::days(3);
    let due_date = TodoUpdate {
        due_date: Patch::Value(due),
        ..Default::default()
    };
    run.ok("set due date", client.update_todo(id, &due_date).await);

    let tags = TodoUpdate {
        tags: Patch::Value(vec!["release".to_string(), "docs".to_string()]),
        ..Default::default()
    };
    run.ok("replace tags", client.update_todo(id, &tags).await);

    let several = TodoUpdate {
        title: Patch::Value("Publish release notes".to_string()),
        priority: Patch::Value("medium".to_string()),
        due_date: Patch::Null,
        ..Default::default()
    };
    if let Some(todo) = run.ok("update several fields", client.update_todo(id, &several).await) {
        run.check(
            "null clears due date",
            todo.due_date.is_none() && todo.priority == Priority::Medium,
            format!("got {todo:?}"),
        );
    }

    if let Some(todo) = run.ok("read back", client.get_todo(id).await) {
        run.check(
            "final state",
            todo.title == "Publish release notes"
                && todo.description == "Cover every merged change"
                && todo.tags == ["release", "docs"]
                && todo.created_at == original.created_at,
            format!("got {todo:?}"),
        );
    }

    run.refused(
        "invalid priority rejected",
        client.update_todo(id, &TodoUpdate::priority("urgent")).await,
        ClientError::is_validation,
    );
    run.refused(
        "unknown id is not found",
        client
            .update_todo("00000000000000000000000000000000", &TodoUpdate::priority("low"))
            .await,
        ClientError::is_not_found,
    );
}

async fn delete(client: &HttpClient, run: &mut Run) {
    let Some(initial) = run.ok("initial stats", client.stats().await) else {
        return;
    };

    let mut ids = Vec::new();
    for n in 1..=5 {
        let body = TodoCreate::new(format!("Disposable todo {n}"));
        if let Some(todo) = run.create(client, &format!("create #{n}"), &body).await {
            ids.push(todo.id);
        }
    }

    let Some((first, rest)) = ids.split_first() else {
        return;
    };

    if let Some(deleted) = run.ok("delete one", client.delete_todo(first).await) {
        run.forget(first);
        run.check("deleted todo returned", deleted.id == *first, "id mismatch");
    }
    run.refused(
        "deleted todo is gone",
        client.get_todo(first).await,
        ClientError::is_not_found,
    );
    run.refused(
        "second delete is not found",
        client.delete_todo(first).await,
        ClientError::is_not_found,
    );

    for id in rest {
        if run.ok("delete remaining", client.delete_todo(id).await).is_some() {
            run.forget(id);
        }
    }

    if let Some(stats) = run.ok("final stats", client.stats().await) {
        run.check(
            "total back to initial",
            stats.total == initial.total,
            format!("expected {}, got {}", initial.total, stats.total),
        );
    }
}

/// Run several scenarios in order
pub async fn run_all(client: &HttpClient, scenarios: &[Scenario]) -> Vec<Report> {
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        reports.push(scenario.run(client).await);
    }
    reports
}
