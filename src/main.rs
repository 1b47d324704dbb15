// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::env;
use std::path::PathBuf;

use presta_conta::format::{format_date, format_period, truncate_text};
use presta_conta::{
    init_logging, Collection, DirectorySource, DocumentFilter, FileStore, JsonGenerator,
    MonthYear, NoticeDetail, Portal, PortalConfig, Session, StatusFilter,
};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn main() -> Result<()> {
    init_logging();
    let config = PortalConfig::from_env();
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("ui");
    let rest = &args[args.len().min(2)..];

    let portal = Portal::new(DirectorySource::new(&config.data_dir));

    match command {
        "home" => run_home(&portal),
        "notices" => run_notices(&portal, rest),
        "activities" => run_activities(&portal, rest),
        "documents" => run_documents(&portal, rest),
        "gallery" => run_gallery(&portal),
        "calendar" => run_calendar(&portal, rest),
        "board" => run_board(&portal),
        "generate" => run_generate(&portal, &config, rest),
        "hash" => run_hash(rest),
        "login" => run_login(&portal, &config, rest),
        "logout" => run_logout(&config),
        "whoami" => run_whoami(&config),
        "ui" => run_ui_mode(portal),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {}", other)
        }
    }
}

fn print_usage() {
    println!("🏘️  Presta Conta {}", presta_conta::VERSION);
    println!("{}", RULE);
    println!("Usage: presta-conta <command>");
    println!();
    println!("  home                              Dashboard snapshot");
    println!("  notices [term]                    Notices, optionally searched");
    println!("  activities [status]               agendado | concluido | cancelado | todos");
    println!("  documents [term]                  Documents grouped by year");
    println!("  gallery                           Photo events by month");
    println!("  calendar <year> <month> [day]     Month grid with activity days");
    println!("  board                             Board roster");
    println!("  generate <collection> [input] [out-dir]");
    println!("  hash <password>                   SHA-256 hash for usuarios.json");
    println!("  login <username> <password>");
    println!("  logout");
    println!("  whoami");
    println!("  ui                                Terminal browser (default)");
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// CONTENT COMMANDS
// ============================================================================

fn run_home(portal: &Portal<DirectorySource>) -> Result<()> {
    let home = portal.home(today());

    println!("🏠 Início");
    println!("{}", RULE);

    println!("\n📌 Destaques");
    for notice in &home.featured {
        println!("  • {} ({})", notice.titulo, format_date(&notice.data_publicacao));
    }

    println!("\n📰 Últimos avisos");
    for notice in &home.notices {
        println!("  • {} ({})", notice.titulo, format_date(&notice.data_publicacao));
        println!("    {}", truncate_text(&notice.conteudo, 80));
    }

    println!("\n📅 Próximas atividades");
    if home.upcoming.is_empty() {
        println!("  Nenhuma atividade agendada.");
    }
    for activity in &home.upcoming {
        println!(
            "  • {} - {} ({})",
            activity.titulo,
            format_period(&activity.data_inicio, &activity.data_fim),
            activity.local
        );
    }

    println!("\n📄 Documentos recentes");
    for document in &home.documents {
        println!("  • {} [{}] {}", document.titulo, document.type_label(), document.period_label());
    }

    println!("\n🖼️  Galeria: {} fotos recentes", home.photos.len());

    if !home.unavailable.is_empty() {
        let names: Vec<&str> = home.unavailable.iter().map(|c| c.title()).collect();
        println!("\n⚠️  Indisponível: {}", names.join(", "));
    }

    Ok(())
}

fn run_notices(portal: &Portal<DirectorySource>, args: &[String]) -> Result<()> {
    // A single argument matching an id shows that notice
    if let [id] = args {
        if let NoticeDetail::Found(notice) = portal.notice(id) {
            println!("📰 {}", notice.titulo);
            println!("{}", RULE);
            println!("Publicado em {}", format_date(&notice.data_publicacao));
            for paragraph in notice.paragraphs() {
                println!("\n{}", paragraph);
            }
            if let Some(file) = &notice.arquivo {
                println!("\n📎 {} ({})", file.nome, file.url);
            }
            return Ok(());
        }
    }

    let term = args.join(" ");
    let view = portal.notices(&term);

    println!("📰 Avisos");
    println!("{}", RULE);
    if let Some(message) = &view.empty_message {
        println!("{}", message);
    }
    for notice in &view.notices {
        let star = if notice.destaque { "★" } else { " " };
        println!(
            "{} [{}] {} - {}",
            star,
            notice.id,
            format_date(&notice.data_publicacao),
            notice.titulo
        );
    }
    Ok(())
}

fn run_activities(portal: &Portal<DirectorySource>, args: &[String]) -> Result<()> {
    let filter: StatusFilter = match args.first() {
        Some(value) => value.parse().map_err(anyhow::Error::msg)?,
        None => StatusFilter::All,
    };
    let view = portal.activities(filter);

    println!("📅 Atividades ({})", view.total);
    println!("{}", RULE);
    if let Some(message) = &view.empty_message {
        println!("{}", message);
    }
    for group in &view.groups {
        println!("\n{}", group.label);
        for activity in &group.items {
            println!(
                "  • {} - {} [{}]",
                format_period(&activity.data_inicio, &activity.data_fim),
                activity.titulo,
                activity.status.label()
            );
        }
    }
    Ok(())
}

fn run_documents(portal: &Portal<DirectorySource>, args: &[String]) -> Result<()> {
    let filter = DocumentFilter {
        term: args.join(" "),
        ..Default::default()
    };
    let view = portal.documents(&filter);

    println!("📄 Documentos ({})", view.total);
    println!("{}", RULE);
    if let Some(message) = &view.empty_message {
        println!("{}", message);
    }
    for group in &view.groups {
        println!("\n{}", group.label);
        for document in &group.items {
            println!("  • {} [{}] {}", document.titulo, document.type_label(), document.url);
        }
    }
    Ok(())
}

fn run_gallery(portal: &Portal<DirectorySource>) -> Result<()> {
    let view = portal.gallery();

    println!("🖼️  Galeria ({} fotos)", view.total);
    println!("{}", RULE);
    if let Some(message) = &view.empty_message {
        println!("{}", message);
    }
    for month in &view.months {
        println!("\n{}", month.label);
        for event in &month.items {
            println!("  • {} ({}) - {} fotos", event.titulo, event.date, event.photos.len());
        }
    }
    Ok(())
}

fn run_calendar(portal: &Portal<DirectorySource>, args: &[String]) -> Result<()> {
    let (month, selected) = match args {
        [year, month, rest @ ..] => {
            let year: i32 = year.parse().context("year must be a number")?;
            let month: u32 = month.parse().context("month must be a number")?;
            let month = MonthYear::new(year, month).context("month must be between 1 and 12 in a supported year")?;
            let selected = match rest.first() {
                Some(day) => {
                    let day: u32 = day.parse().context("day must be a number")?;
                    Some(
                        NaiveDate::from_ymd_opt(month.year, month.month, day)
                            .context("day is outside the month")?,
                    )
                }
                None => None,
            };
            (month, selected)
        }
        _ => (MonthYear::from_date(today()), None),
    };

    let view = portal.calendar(month, selected, today());

    println!("🗓️  {}", view.label);
    println!("{}", RULE);
    println!(" Dom  Seg  Ter  Qua  Qui  Sex  Sáb");
    for week in &view.weeks {
        let mut line = String::new();
        for slot in week {
            match slot {
                Some(cell) => {
                    let mark = if cell.is_selected {
                        '>'
                    } else if cell.has_activity {
                        '*'
                    } else if cell.is_today {
                        '.'
                    } else {
                        ' '
                    };
                    line.push_str(&format!(" {}{:>2} ", mark, cell.day.day()));
                }
                None => line.push_str("     "),
            }
        }
        println!("{}", line);
    }
    println!("\n* dia com atividade   . hoje   > selecionado");

    if let Some(label) = &view.selected_label {
        println!("\n📍 {}", label);
        if view.selected_activities.is_empty() {
            println!("  Nenhuma atividade neste dia.");
        }
        for activity in &view.selected_activities {
            println!("  • {} ({}) [{}]", activity.titulo, activity.local, activity.status.label());
        }
    }
    Ok(())
}

fn run_board(portal: &Portal<DirectorySource>) -> Result<()> {
    let state = portal.board();
    let Some(roster) = state.value() else {
        println!("👥 Diretoria indisponível.");
        return Ok(());
    };

    println!("👥 Diretoria - Mandato {}", roster.mandato);
    println!("{}", RULE);
    println!("\nDiretoria Executiva");
    for member in &roster.diretoria_executiva {
        println!("  • {}: {}", member.cargo, member.nome);
    }
    println!("\nConselho Fiscal");
    for member in &roster.conselho_fiscal {
        println!("  • {}", member.nome);
    }
    println!("\nSuplentes do Conselho Fiscal");
    for member in &roster.suplentes_conselho_fiscal {
        println!("  • {}", member.nome);
    }
    Ok(())
}

// ============================================================================
// ADMIN COMMANDS
// ============================================================================

fn run_generate(portal: &Portal<DirectorySource>, config: &PortalConfig, args: &[String]) -> Result<()> {
    let Some(name) = args.first() else {
        bail!("usage: presta-conta generate <collection> [input] [out-dir]");
    };
    require_admin(config)?;

    let collection: Collection = name.parse()?;
    let mut generator = JsonGenerator::new(collection)?;

    println!("🛠️  Gerador JSON - {}", collection.title());
    println!("{}", RULE);

    let input = match args.get(1) {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?,
        None => generator.load_current(portal.source())?,
    };

    generator.generate(&input)?;
    let out_dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    if let Some(path) = generator.download(&out_dir)? {
        println!("✓ JSON gerado com sucesso: {}", path.display());
        println!("  Copie o arquivo para {}", config.data_dir.display());
    }
    Ok(())
}

fn run_hash(args: &[String]) -> Result<()> {
    let Some(password) = args.first() else {
        bail!("usage: presta-conta hash <password>");
    };
    println!("{}", presta_conta::Credential::hash_password(password));
    Ok(())
}

fn run_login(portal: &Portal<DirectorySource>, config: &PortalConfig, args: &[String]) -> Result<()> {
    let [username, password] = args else {
        bail!("usage: presta-conta login <username> <password>");
    };

    let mut session = Session::restore(FileStore::new(&config.session_file))?;
    match session.login(&portal.credentials(), username, password) {
        Ok(user) => {
            println!("✅ Bem-vindo, {}!", user.nome);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Usuário ou senha inválidos");
            Err(e.into())
        }
    }
}

fn run_logout(config: &PortalConfig) -> Result<()> {
    let mut session = Session::restore(FileStore::new(&config.session_file))?;
    session.logout()?;
    println!("👋 Sessão encerrada");
    Ok(())
}

fn run_whoami(config: &PortalConfig) -> Result<()> {
    let session = Session::restore(FileStore::new(&config.session_file))?;
    match session.user() {
        Some(user) => println!("🔐 {} ({}) - {}", user.nome, user.username, user.role),
        None => println!("🔓 Nenhum usuário conectado"),
    }
    Ok(())
}

fn require_admin(config: &PortalConfig) -> Result<()> {
    let session = Session::restore(FileStore::new(&config.session_file))?;
    if !session.has_permission("admin") {
        bail!("admin login required (presta-conta login <username> <password>)");
    }
    Ok(())
}

// ============================================================================
// UI MODE
// ============================================================================

#[cfg(feature = "tui")]
fn run_ui_mode(portal: Portal<DirectorySource>) -> Result<()> {
    println!("🖥️  Loading Presta Conta UI...\n");
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(portal, today());
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_portal: Portal<DirectorySource>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin presta-server --features server");
    std::process::exit(1);
}
