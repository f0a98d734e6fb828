//! Terminal front end. Every command is turned into a route path, parsed back
//! through the route table, and handed to the resolver and controllers the
//! same way a router would.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;

use crate::entities::{
    DeleteDialog, EntityApi, EntityResolver, EntityService, ListController,
    SaveOutcome, UpdateController,
};
use crate::models::{parse_assignment, Entity, Form, Job, Sales, Validate};
use crate::rest_client::{RequestOptions, RestClient};
use crate::routes::{Action, EntityKind, History, Navigator, Route, RouteSnapshot};

#[derive(Debug, Parser)]
#[command(name = "webapp")]
#[command(about = "Terminal front end for the Job and Sales entities")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub entity: EntityCommand,
}

#[derive(Debug, Subcommand)]
pub enum EntityCommand {
    /// Job postings
    Job {
        #[command(subcommand)]
        action: ActionCommand,
    },
    /// Sales records
    Sales {
        #[command(subcommand)]
        action: ActionCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ActionCommand {
    /// List one page of entities
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
        /// `field,direction`, repeatable
        #[arg(long)]
        sort: Vec<String>,
        /// `criteria=value`, e.g. `title.contains=report`; repeatable
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Count entities matching the filters
    Count {
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Show one entity
    View { id: i64 },
    /// Create an entity from `--set field=value` pairs
    New {
        #[arg(long = "set")]
        fields: Vec<String>,
    },
    /// Edit an entity with `--set field=value` pairs
    Edit {
        id: i64,
        #[arg(long = "set")]
        fields: Vec<String>,
    },
    /// Delete an entity; without `--yes` the dialog is cancelled
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

impl ActionCommand {
    fn action(&self) -> Action {
        match self {
            ActionCommand::List { .. } | ActionCommand::Count { .. } => Action::List,
            ActionCommand::View { id } => Action::View(*id),
            ActionCommand::New { .. } => Action::New,
            ActionCommand::Edit { id, .. } => Action::Edit(*id),
            ActionCommand::Delete { id, .. } => Action::Delete(*id),
        }
    }
}

/// Wires the shared REST client and navigation history into per-entity
/// services and controllers.
pub struct App {
    client: RestClient,
    history: Arc<History>,
}

impl App {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            history: Arc::new(History::new("")),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub async fn run(&self, command: EntityCommand) -> Result<Value> {
        match command {
            EntityCommand::Job { action } => {
                self.run_entity::<Job>(EntityKind::Job, action).await
            }
            EntityCommand::Sales { action } => {
                self.run_entity::<Sales>(EntityKind::Sales, action).await
            }
        }
    }

    async fn run_entity<T>(&self, kind: EntityKind, command: ActionCommand) -> Result<Value>
    where
        T: Entity + Form + Validate,
    {
        let api: Arc<dyn EntityApi<T>> = Arc::new(EntityService::<T>::new(self.client.clone()));
        let navigator: Arc<dyn Navigator> = self.history.clone();

        let snapshot = self.open(kind, command.action())?;
        info!("Opened route '{}'", snapshot.path);

        match command {
            ActionCommand::List {
                page,
                size,
                sort,
                filters,
            } => {
                let mut options = parse_filters(&filters)?;
                options.page = page;
                options.size = size;
                options.sort = sort;
                let mut list = ListController::new(api, options);
                let items = list.load().await?.to_vec();
                Ok(json!({
                    "page_title": snapshot.page_title,
                    "items": items,
                    "total_items": list.total_items(),
                }))
            }
            ActionCommand::Count { filters } => {
                let count = api.count(&parse_filters(&filters)?).await?;
                Ok(json!({ "count": count }))
            }
            ActionCommand::View { .. } => {
                let entity = self.resolve(&api, &navigator, &snapshot).await?;
                Ok(serde_json::to_value(entity)?)
            }
            ActionCommand::New { fields } | ActionCommand::Edit { fields, .. } => {
                let entity = self.resolve(&api, &navigator, &snapshot).await?;
                let controller = UpdateController::new(api, navigator);
                controller.init(entity);
                for raw in &fields {
                    let (field, value) = parse_assignment(raw)
                        .ok_or_else(|| anyhow!("Expected field=value, got '{raw}'"))?;
                    controller.set_field(field, Some(value)).with_context(|| {
                        format!("{} fields are: {}", T::ROUTE, T::FIELDS.join(", "))
                    })?;
                }
                match controller.save().await {
                    SaveOutcome::Saved(saved) => Ok(json!({
                        "saved": saved,
                        "route": self.history.current(),
                    })),
                    SaveOutcome::Invalid(violations) => {
                        let reasons: Vec<String> =
                            violations.iter().map(ToString::to_string).collect();
                        bail!("Form is invalid: {}", reasons.join("; "))
                    }
                    SaveOutcome::Failed(e) => {
                        Err(e).with_context(|| format!("Saving {} failed", T::ROUTE))
                    }
                }
            }
            ActionCommand::Delete { id, yes } => {
                let entity = self.resolve(&api, &navigator, &snapshot).await?;
                let dialog = DeleteDialog::new(api.clone(), entity);
                let result = if yes {
                    dialog.confirm_delete(id).await?
                } else {
                    dialog.cancel()
                };
                navigator.back();

                let mut list = ListController::new(api, RequestOptions::new());
                let remaining = if list.on_dialog_closed(result).await? {
                    list.total_items()
                } else {
                    None
                };
                Ok(json!({
                    "entity": dialog.entity(),
                    "result": result,
                    "remaining": remaining,
                }))
            }
        }
    }

    /// Navigates to the route and returns its snapshot as the router would see it.
    fn open(&self, kind: EntityKind, action: Action) -> Result<RouteSnapshot> {
        let path = Route::entity(kind, action).to_string();
        let route = Route::parse(&path);
        if route == Route::NotFound {
            bail!("No route matches '{path}'");
        }
        self.history.navigate(&path);
        Ok(route.snapshot())
    }

    async fn resolve<T: Entity>(
        &self,
        api: &Arc<dyn EntityApi<T>>,
        navigator: &Arc<dyn Navigator>,
        snapshot: &RouteSnapshot,
    ) -> Result<T> {
        EntityResolver::new(api.clone(), navigator.clone())
            .resolve(snapshot)
            .await?
            .ok_or_else(|| {
                anyhow!(
                    "'{}' not found, redirected to {:?}",
                    snapshot.path,
                    self.history.current()
                )
            })
    }
}

fn parse_filters(raw: &[String]) -> Result<RequestOptions> {
    raw.iter().try_fold(RequestOptions::new(), |options, f| {
        let (key, value) = RequestOptions::parse_filter(f)
            .ok_or_else(|| anyhow!("Expected criteria=value, got '{f}'"))?;
        Ok(options.filter(key, value))
    })
}
