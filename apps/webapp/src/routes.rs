//! Route table for the entity features, route snapshots handed to resolvers,
//! and the navigation seam controllers use instead of a browser history.

use std::fmt;
use std::sync::Mutex;

use tracing::debug;

use crate::models::{Entity, Job, Sales};

pub const NOT_FOUND_ROUTE: &str = "404";

/// Entity features reachable from the top-level route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Job,
    Sales,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Job, EntityKind::Sales];

    pub fn route(self) -> &'static str {
        match self {
            EntityKind::Job => Job::ROUTE,
            EntityKind::Sales => Sales::ROUTE,
        }
    }

    pub fn page_title(self) -> &'static str {
        match self {
            EntityKind::Job => Job::PAGE_TITLE,
            EntityKind::Sales => Sales::PAGE_TITLE,
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.route() == segment)
    }
}

/// Sub-routes every entity feature exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    New,
    View(i64),
    Edit(i64),
    Delete(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Entity { kind: EntityKind, action: Action },
    NotFound,
}

impl Route {
    /// Matches a path such as `job`, `job/new` or `sales/12/edit`.
    /// Anything unrecognised, including non-numeric ids, is `NotFound`.
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let Some((first, rest)) = segments.split_first() else {
            return Route::NotFound;
        };
        let Some(kind) = EntityKind::from_segment(first) else {
            return Route::NotFound;
        };

        let action = match rest {
            [] => Some(Action::List),
            ["new"] => Some(Action::New),
            [id, verb] => id.parse::<i64>().ok().and_then(|id| match *verb {
                "view" => Some(Action::View(id)),
                "edit" => Some(Action::Edit(id)),
                "delete" => Some(Action::Delete(id)),
                _ => None,
            }),
            _ => None,
        };

        match action {
            Some(action) => Route::Entity { kind, action },
            None => Route::NotFound,
        }
    }

    pub fn entity(kind: EntityKind, action: Action) -> Route {
        Route::Entity { kind, action }
    }

    pub fn snapshot(&self) -> RouteSnapshot {
        let (id, page_title) = match self {
            Route::Entity { kind, action } => {
                let id = match action {
                    Action::View(id) | Action::Edit(id) | Action::Delete(id) => Some(*id),
                    Action::List | Action::New => None,
                };
                (id, Some(kind.page_title()))
            }
            Route::NotFound => (None, None),
        };
        RouteSnapshot {
            path: self.to_string(),
            id,
            page_title,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::NotFound => f.write_str(NOT_FOUND_ROUTE),
            Route::Entity { kind, action } => {
                let base = kind.route();
                match action {
                    Action::List => write!(f, "{base}"),
                    Action::New => write!(f, "{base}/new"),
                    Action::View(id) => write!(f, "{base}/{id}/view"),
                    Action::Edit(id) => write!(f, "{base}/{id}/edit"),
                    Action::Delete(id) => write!(f, "{base}/{id}/delete"),
                }
            }
        }
    }
}

/// What a resolver sees of the matched route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteSnapshot {
    pub path: String,
    /// The `:id` parameter, when the route carries one.
    pub id: Option<i64>,
    pub page_title: Option<&'static str>,
}

impl RouteSnapshot {
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Navigation seam. Controllers call this instead of touching any global router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);

    /// Returns to the previous route, like a browser "back".
    fn back(&self);
}

/// In-process navigation history: a stack of visited routes.
#[derive(Debug, Default)]
pub struct History {
    stack: Mutex<Vec<String>>,
}

impl History {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            stack: Mutex::new(vec![start.into()]),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.stack
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Navigator for History {
    fn navigate(&self, route: &str) {
        debug!("navigate -> {route}");
        self.lock().push(route.to_string());
    }

    fn back(&self) {
        let mut stack = self.lock();
        // The first entry is where the session started; never pop past it.
        if stack.len() > 1 {
            stack.pop();
        }
        debug!("navigate back -> {:?}", stack.last());
    }
}
