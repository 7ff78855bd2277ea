use super::*;

#[test]
fn parses_bare_scrape_command() {
    let cli = Cli::try_parse_from(["skog", "scrape"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Scrape {
            root: None,
            layout: None,
            cache_dir: None,
            out: None,
        }
    ));
}

#[test]
fn parses_scrape_overrides() {
    let cli = Cli::try_parse_from([
        "skog",
        "scrape",
        "--root",
        "http://derks.spar.nl",
        "--layout",
        "badged",
        "--cache-dir",
        "./cache",
        "--out",
        "products.jsonl",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Scrape {
            root,
            layout,
            cache_dir,
            out,
        } => {
            assert_eq!(root.as_deref(), Some("http://derks.spar.nl"));
            assert_eq!(layout.as_deref(), Some("badged"));
            assert_eq!(cache_dir, Some(PathBuf::from("./cache")));
            assert_eq!(out, Some(PathBuf::from("products.jsonl")));
        }
        other => panic!("expected scrape command, got: {other:?}"),
    }
}

#[test]
fn parses_image_command() {
    let cli = Cli::try_parse_from([
        "skog",
        "image",
        "http://derks.spar.nl/media/image/m/i/milk.jpg",
        "--out",
        "milk.jpg",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Image { ref uri, ref out }
            if uri.ends_with("milk.jpg") && out == &PathBuf::from("milk.jpg")
    ));
}

#[test]
fn image_requires_out() {
    assert!(Cli::try_parse_from(["skog", "image", "http://x/a.jpg"]).is_err());
}

#[test]
fn command_is_required() {
    assert!(Cli::try_parse_from(["skog"]).is_err());
}
