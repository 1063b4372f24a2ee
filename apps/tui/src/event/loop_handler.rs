use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::Stdout;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use census_map_core::geojson::FeatureCollection;
use census_map_core::{LatLng, LoadError, LoadTicket, LookupOutcome, LookupQuery};
use census_map_tui::{AppConfig, CensusClient, LayerSource};

use crate::app::{handle_input, handle_mouse, Action, App};
use crate::cli::CliArgs;
use crate::ui;

/// Results of spawned fetches, applied on the UI loop.
#[derive(Debug)]
enum Completion {
    Loaded {
        ticket: LoadTicket,
        result: Result<FeatureCollection, LoadError>,
    },
    LookedUp {
        at: LatLng,
        outcome: LookupOutcome,
    },
}

fn apply(app: &mut App, completion: Completion) {
    match completion {
        Completion::Loaded { ticket, result } => app.apply_load(&ticket, result),
        Completion::LookedUp { at, outcome } => app.apply_lookup(at, &outcome),
    }
}

fn dispatch(action: Action, layer_base: &str, client: &CensusClient, tx: &UnboundedSender<Completion>) {
    let client = client.clone();
    let tx = tx.clone();

    match action {
        Action::Load(ticket) => {
            let source = LayerSource::resolve(layer_base, &ticket.source_url);
            log::info!("fetching layer {} from {source}", ticket.layer);
            tokio::spawn(async move {
                let result = client.fetch_layer(&source).await;
                if tx.send(Completion::Loaded { ticket, result }).is_err() {
                    log::debug!("ui loop gone, dropping layer load");
                }
            });
        }
        Action::Lookup { at, query } => {
            tokio::spawn(async move {
                let outcome = client.lookup(&query).await;
                if tx.send(Completion::LookedUp { at, outcome }).is_err() {
                    log::debug!("ui loop gone, dropping lookup for {}", query.scope());
                }
            });
        }
    }
}

/// Run the application without a terminal UI
pub async fn run_headless(args: &CliArgs, config: &AppConfig, client: &CensusClient) -> Result<()> {
    match &args.state {
        Some(state) => {
            let query = match &args.county {
                Some(county) => LookupQuery::county(state, county),
                None => LookupQuery::state(state),
            };
            render_headless_lookup(client, &query, args.json).await
        }
        None => render_headless_layers(config, client, args.json).await,
    }
}

async fn render_headless_lookup(client: &CensusClient, query: &LookupQuery, json: bool) -> Result<()> {
    let table = client
        .lookup(query)
        .await
        .map_err(|e| eyre!("{} ({e})", e.user_message()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("\n{}", table.location);
    println!("{}", "=".repeat(table.location.chars().count().max(8)));
    if table.rows.is_empty() {
        println!("(no language rows)");
    }
    for row in &table.rows {
        println!("- {}: {}", row.label, row.estimate);
    }

    Ok(())
}

async fn render_headless_layers(config: &AppConfig, client: &CensusClient, json: bool) -> Result<()> {
    let descriptors = config.map.descriptors().map_err(|e| eyre!("{e}"))?;
    let mut layers = Vec::with_capacity(descriptors.len());

    for descriptor in &descriptors {
        let source = LayerSource::resolve(&config.layer_base, &descriptor.source_url);
        let (features, error) = match client.fetch_layer(&source).await {
            Ok(collection) => (Some(collection.features.len()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        layers.push(HeadlessLayer {
            label: descriptor.label.clone(),
            source: source.to_string(),
            color: descriptor.color.to_string(),
            lookup: descriptor.lookup_enabled,
            features,
            error,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&layers)?);
        return Ok(());
    }

    println!("\nMap Layers");
    println!("==========");
    for layer in &layers {
        let detail = match (&layer.features, &layer.error) {
            (Some(count), _) => format!("{count} features"),
            (None, Some(error)) => format!("error: {error}"),
            (None, None) => "not loaded".to_string(),
        };
        let lookup = if layer.lookup { "lookup" } else { "display" };
        println!("- {} | {} | {lookup} | {detail}", layer.label, layer.color);
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct HeadlessLayer {
    label: String,
    source: String,
    color: String,
    lookup: bool,
    features: Option<usize>,
    error: Option<String>,
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    client: CensusClient,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let (tx, mut rx) = unbounded_channel();

    loop {
        while let Ok(completion) = rx.try_recv() {
            apply(app, completion);
        }

        let size = terminal.size()?;
        app.screen = Rect::new(0, 0, size.width, size.height);

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            let action = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => handle_input(app, key.code),
                Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
                Ok(_) | Err(_) => None,
            };

            if let Some(action) = action {
                dispatch(action, &app.layer_base, &client, &tx);
            }
            if !app.running {
                break;
            }
        }
    }
    Ok(())
}
