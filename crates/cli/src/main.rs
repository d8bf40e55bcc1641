use crickpacks_core::{
    Event, EventBus, OwnedCard, PackItem, PackKind, RngState, Role, Session, Tier,
};
use crickpacks_data::{
    default_data_dir, load_pack_catalog_or_builtin, load_state, persist, FileStorage,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pause between resolving a pack and committing it, so the reveal reads
/// as a reveal even in a terminal.
const REVEAL_DELAY: Duration = Duration::from_millis(1500);

const RESTORE_AMOUNT: i64 = 5000;

fn main() {
    let mut draw_seed = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                draw_seed = args.next().and_then(|value| value.parse::<u64>().ok());
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            other => {
                eprintln!("unknown option {other}");
                return;
            }
        }
    }

    let catalog = match load_pack_catalog_or_builtin(Path::new("assets")) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("failed to load pack catalog: {err:#}");
            return;
        }
    };
    let storage = FileStorage::new(default_data_dir().unwrap_or_else(|| PathBuf::from(".")));
    let fallback_seed = RngState::from_entropy().seed();
    let (store, roster_seed) = load_state(&storage, fallback_seed);
    let draw_seed = draw_seed.unwrap_or_else(|| RngState::from_entropy().seed());
    let mut session = Session::new(catalog, store, roster_seed, draw_seed);
    let mut events = EventBus::default();

    println!("Cricket pack opener. Type 'help' for commands.");
    print_balance(&session);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("read error: {err}");
                break;
            }
        }
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        match command {
            "open" | "o" => {
                let kind = parts.next().and_then(PackKind::parse);
                open_pack(&mut session, &mut events, &storage, kind);
            }
            "packs" | "p" => print_catalog(&session),
            "collection" | "c" => {
                let mut tier = None;
                let mut role = None;
                for filter in parts {
                    if let Some(parsed) = Tier::parse(filter) {
                        tier = Some(parsed);
                    } else if let Some(parsed) = Role::parse(filter) {
                        role = Some(parsed);
                    } else {
                        println!("unknown filter '{filter}'");
                    }
                }
                print_collection(&session, tier, role);
            }
            "coins" => print_balance(&session),
            "add" | "a" => {
                let amount = parts
                    .next()
                    .and_then(|value| value.parse::<i64>().ok())
                    .unwrap_or(RESTORE_AMOUNT);
                session.add_coins(amount, &mut events);
                persist(&storage, &session.state, session.roster_seed());
                report_events(&mut events);
            }
            "mute" | "m" => {
                session.toggle_mute(&mut events);
                persist(&storage, &session.state, session.roster_seed());
                report_events(&mut events);
            }
            "reset" => {
                session.reset(&mut events);
                persist(&storage, &session.state, session.roster_seed());
                report_events(&mut events);
            }
            "state" => match serde_json::to_string_pretty(&session.state) {
                Ok(body) => println!("{body}"),
                Err(err) => eprintln!("serialize error: {err}"),
            },
            "help" | "?" => print_help(),
            "quit" | "exit" | "x" => break,
            other => println!("unknown command '{other}' (try 'help')"),
        }
    }
}

fn open_pack(
    session: &mut Session,
    events: &mut EventBus,
    storage: &FileStorage,
    kind: Option<PackKind>,
) {
    let Some(kind) = kind else {
        println!("usage: open <bronze|silver|gold>");
        return;
    };
    match session.resolve_open(kind) {
        Ok(result) => {
            println!("Opening {} pack...", result.kind.label());
        }
        Err(err) => {
            println!("{err}");
            return;
        }
    }
    // Reveal pacing between the two phases; the commit fires whenever the
    // timer gets around to waking up.
    std::thread::sleep(REVEAL_DELAY);
    match session.commit(events) {
        Ok(result) => {
            for item in &result.items {
                print_item(item);
            }
            if result.any_premium {
                println!("*** Epic or Legend pull! ***");
            }
            println!(
                "Coins change: {:+} (balance {})",
                result.coins_delta, session.state.coins
            );
            persist(storage, &session.state, session.roster_seed());
            report_events(events);
        }
        Err(err) => println!("{err}"),
    }
}

fn print_item(item: &PackItem) {
    let card = &item.card;
    let note = if item.converted_coins > 0 {
        format!("dupe, converted to {} coins", item.converted_coins)
    } else if item.upgraded {
        "dupe, star upgrade".to_string()
    } else if item.is_dupe {
        "dupe".to_string()
    } else {
        "new".to_string()
    };
    println!(
        "  [{:6}] {:3} {:14} {:4} {:18} ({note})",
        card.tier.label(),
        card.rating,
        card.name,
        card.role.code(),
        card.team,
    );
}

fn print_catalog(session: &Session) {
    for pack in &session.catalog.packs {
        let odds: Vec<String> = pack
            .odds
            .iter()
            .map(|entry| format!("{} {}%", entry.tier.label(), entry.weight))
            .collect();
        println!(
            "{:6} {:5} coins, {} cards ({})",
            pack.kind.label(),
            pack.price,
            pack.draws,
            odds.join(", ")
        );
    }
}

fn print_collection(session: &Session, tier: Option<Tier>, role: Option<Role>) {
    let cards = session.state.collection(tier, role);
    if cards.is_empty() {
        println!("no cards match");
        return;
    }
    for owned in &cards {
        print_owned(owned);
    }
    println!("{} cards", cards.len());
}

fn print_owned(owned: &OwnedCard) {
    let card = &owned.card;
    println!(
        "  [{:6}] {:3} {:14} {:4} {:18} {} x{}",
        card.tier.label(),
        card.rating,
        card.name,
        card.role.code(),
        card.team,
        "*".repeat(owned.stars as usize),
        owned.count,
    );
}

fn print_balance(session: &Session) {
    println!(
        "Coins: {}{}",
        session.state.coins,
        if session.state.mute { " (muted)" } else { "" }
    );
}

fn report_events(events: &mut EventBus) {
    for event in events.drain() {
        match event {
            Event::PackApplied {
                new_cards,
                upgrades,
                conversions,
                ..
            } => {
                println!("{new_cards} new, {upgrades} upgraded, {conversions} converted");
            }
            Event::CoinsAdded { amount, coins } => {
                println!("added {amount} coins (balance {coins})");
            }
            Event::MuteToggled { mute } => {
                println!("sound {}", if mute { "off" } else { "on" });
            }
            Event::StateReset => println!("state reset"),
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  open <bronze|silver|gold>   buy and reveal a pack (o)");
    println!("  packs                       list pack prices and odds (p)");
    println!("  collection [tier] [role]    show owned cards, filterable (c)");
    println!("  coins                       show balance");
    println!("  add [amount]                add coins, default {RESTORE_AMOUNT} (a)");
    println!("  mute                        toggle the sound preference (m)");
    println!("  reset                       wipe progress back to defaults");
    println!("  state                       dump the raw state as JSON");
    println!("  quit                        leave (x)");
    println!("options: --seed <n> fixes the draw sequence");
}
