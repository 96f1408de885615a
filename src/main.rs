#![cfg(not(tarpaulin_include))]

use clap::Parser;
use datatable::app::DataTable;
use datatable::command::{Command, HELP};
use datatable::config::TableConfig;
use datatable::view::SortOrder;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Interactive data table: import, browse, edit and export CSV data.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV file to import at start-up
    file: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rows per page (overrides the configuration)
    #[arg(long)]
    page_size: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TableConfig::from_json_file(path)?,
        None => TableConfig::default(),
    };
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
        config.validate()?;
    }

    let mut table = DataTable::new(config);
    let mut status = String::from("ok");
    if let Some(path) = &args.file {
        status = import_status(table.import_file(path));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut start_time = Instant::now();
    loop {
        display(&table);

        let elapsed_time = start_time.elapsed().as_secs_f64();
        print!("[{:.1}] ({}) > ", elapsed_time, status);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        start_time = Instant::now();

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                status = e;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        status = execute(&mut table, command);
    }

    Ok(())
}

fn execute(table: &mut DataTable, command: Command) -> String {
    let ok = || String::from("ok");
    match command {
        Command::Import(path) => import_status(table.import_file(&path)),
        Command::Export(path) => match table.export_file(path.as_deref()) {
            Ok(written) => format!("exported to {}", written.display()),
            Err(e) => e.to_string(),
        },
        Command::Search(query) => {
            table.search(&query);
            ok()
        }
        Command::Sort(key) => {
            table.sort_by(&key);
            ok()
        }
        Command::Page(page) => {
            if table.go_to_page(page) {
                ok()
            } else {
                String::from("no such page")
            }
        }
        Command::Next => {
            if table.next_page() {
                ok()
            } else {
                String::from("already on the last page")
            }
        }
        Command::Prev => {
            if table.prev_page() {
                ok()
            } else {
                String::from("already on the first page")
            }
        }
        Command::Edit(id) => {
            if table.begin_edit(&id) {
                format!("editing {}", id)
            } else {
                String::from("no such row")
            }
        }
        Command::Set { key, value } => match table.set_draft_field(&key, &value) {
            Ok(()) => ok(),
            Err(e) => e.to_string(),
        },
        Command::Save => match table.save_edit() {
            Ok(()) => String::from("saved"),
            Err(e) => e.to_string(),
        },
        Command::Cancel => match table.cancel_edit() {
            Ok(()) => String::from("edit discarded"),
            Err(e) => e.to_string(),
        },
        Command::Delete(id) => {
            table.delete_row(&id);
            ok()
        }
        Command::Columns => {
            for (i, col) in table.store().columns().iter().enumerate() {
                let mark = if col.visible { "x" } else { " " };
                println!("  {}: [{}] {} ({})", i, mark, col.label, col.key);
            }
            ok()
        }
        Command::Toggle(key) => {
            table.toggle_column(&key);
            ok()
        }
        Command::AddColumn { key, label } => {
            if table.add_column(&key, &label) {
                ok()
            } else {
                String::from("column not added (blank or duplicate key)")
            }
        }
        Command::MoveColumn { from, to } => {
            if table.move_column(from, to) {
                ok()
            } else {
                String::from("no such column position")
            }
        }
        Command::SaveAll => table.save_all().to_string(),
        Command::CancelAll => table.cancel_all().to_string(),
        Command::Help => {
            println!("{}", HELP);
            ok()
        }
        Command::Quit => ok(),
    }
}

fn import_status(result: datatable::Result<usize>) -> String {
    match result {
        Ok(0) => String::from("No rows parsed or invalid CSV"),
        Ok(n) => format!("imported {} rows", n),
        Err(e) => e.to_string(),
    }
}

fn display(table: &DataTable) {
    let columns = table.visible_columns();
    let sort = table.view_state().sort();

    print!("{:<16}", "id");
    for col in &columns {
        let arrow = match (sort.key.as_deref() == Some(col.key.as_str()), sort.order) {
            (true, SortOrder::Ascending) => " ^",
            (true, SortOrder::Descending) => " v",
            _ => "",
        };
        print!("{:<16}", format!("{}{}", col.label, arrow));
    }
    println!();

    let page = table.page();
    let draft = table.session().draft();
    for row in &page.rows {
        let editing = table.session().editing_id() == Some(row.id());
        print!("{:<16}", if editing { format!("*{}", row.id()) } else { row.id().to_string() });
        for col in &columns {
            let value = match (editing, draft) {
                (true, Some(draft)) => draft.get(&col.key),
                _ => row.get(&col.key),
            };
            print!("{:<16}", value.map(|v| v.to_string()).unwrap_or_default());
        }
        println!();
    }

    let pages = table.page_count().max(1);
    println!(
        "page {}/{} ({} rows)",
        table.view_state().page() + 1,
        pages,
        page.total_count
    );
}
