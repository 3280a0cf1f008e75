use gosub_navigator::app::{App, NavigationEvent, Route};
use gosub_navigator::context::BrowsingContext;
use gosub_navigator::dom::Document;
use gosub_navigator::net::{Fetcher, HttpFetcher};
use gosub_navigator::screen::{HtmlScreen, Screen};
use gosub_navigator::NavigatorConfig;
use std::sync::Arc;
use url::Url;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Usage: navigate <start url> [path...]
    let mut args = std::env::args().skip(1);
    let start = args.next().unwrap_or_else(|| "https://example.com/".to_string());
    let mut paths: Vec<String> = args.collect();
    if paths.is_empty() {
        paths.push("/".to_string());
    }

    let config = NavigatorConfig::builder().timeout_ms(10_000).build()?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config)?);

    // The live document exposes a single surface that pages may fill
    let mut document = Document::new();
    document.add_surface("content");

    let context = BrowsingContext::new(Url::parse(&start)?);
    let mut app = App::new(config.clone(), context, document)?;

    // Every path on the site is served by an html screen
    let screen_config = config.clone();
    app.add_route(Route::matching(
        |_path: &str| true,
        move || Box::new(HtmlScreen::with_config(&screen_config, fetcher.clone())) as Box<dyn Screen>,
    ));

    let mut event_rx = app.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            match event {
                NavigationEvent::StartNavigate { path, .. } => println!("-> {path}"),
                NavigationEvent::EndNavigate { path, redirect_path, error: None } => {
                    println!("<- {path} (landed on {})", redirect_path.unwrap_or_default())
                }
                NavigationEvent::EndNavigate { path, error: Some(e), .. } => println!("<- {path} failed: {e}"),
            }
        }
    });

    for path in paths {
        match app.navigate(&path, false).await {
            Ok(()) => {
                let doc = app.document();
                println!("location: {}", app.context().location());
                println!("title:    {}", doc.title);
                println!("body:     {:?}", doc.body.attributes);
                println!("resources: {}", doc.resources.len());
            }
            Err(e) => println!("navigation to {path} failed: {e}"),
        }
    }

    println!("history entries: {}", app.history().len());
    if let Some(state) = &app.history().current().state {
        println!("history state: {}", serde_json::to_string(state)?);
    }
    Ok(())
}
