//! Interactive trajectory tracer for tuning jump and duck timing.
//!
//! Type a command script such as `j r30 d5` and get a per-tick table of the
//! character's feet, velocity and hitbox height.

use dino_world::{Character, Command, Tuning};
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             Dino Trajectory Tracer                   ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let tuning = Tuning::default();
    println!(
        "  ground_y={}  jump={}  gravity={}  airtime={} ticks",
        tuning.ground_y, tuning.jump_velocity, tuning.gravity, tuning.airtime_ticks()
    );
    println!();

    loop {
        let line = read_line("Script (r/j/d with optional counts, q to quit): ");
        if line.trim().eq_ignore_ascii_case("q") || line.is_empty() {
            println!("\nGoodbye!\n");
            break;
        }

        let script = match parse_script(&line) {
            Ok(s) if !s.is_empty() => s,
            Ok(_)  => continue,
            Err(tok) => { println!("  ⚠  Cannot read `{}`.\n", tok); continue; }
        };

        let mut character = Character::new(tuning);
        println!("  ┌──────┬──────┬──────┬──────┬────────┐");
        println!("  │ tick │ cmd  │    y │  vel │ hit h  │");
        println!("  ├──────┼──────┼──────┼──────┼────────┤");
        for (tick, cmd) in script.iter().enumerate() {
            character.update(*cmd);
            println!(
                "  │ {:>4} │ {:<4} │ {:>4} │ {:>4} │ {:>6} │",
                tick + 1, cmd.name(), character.y(), character.velocity(), character.bounds().h
            );
        }
        println!("  └──────┴──────┴──────┴──────┴────────┘");
        println!();
    }
}

/// Expand tokens like `j`, `r30`, `d5` into one command per tick.
fn parse_script(line: &str) -> Result<Vec<Command>, String> {
    let mut out = Vec::new();
    for tok in line.split_whitespace() {
        let mut chars = tok.chars();
        let cmd = match chars.next().map(|c| c.to_ascii_lowercase()) {
            Some('r') => Command::Run,
            Some('j') => Command::Jump,
            Some('d') => Command::Duck,
            _ => return Err(tok.to_string()),
        };
        let rest = chars.as_str();
        let n: usize = if rest.is_empty() {
            1
        } else {
            rest.parse().map_err(|_| tok.to_string())?
        };
        out.extend(std::iter::repeat(cmd).take(n.min(10_000)));
    }
    Ok(out)
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
