//! Interactive shell: one command per line, the session stays loaded between them.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};
use colored::Colorize;
use session::{
    Session, UserSelector, DEFAULT_RANKED_MOVIES, DEFAULT_RECOMMENDATIONS,
};

use crate::query::{run_query, Query};

const HELP: &str = "\
Commands:
  user <id|random>   switch to another user
  mean               average rating
  recs [n]           n recommendations (1-20, default 5)
  top [n]            n highest rated movies (default 10)
  bottom [n]         n lowest rated movies (default 10)
  accuracy           how often the model was close enough
  reviews            number of ratings on record
  summary            all of the above numbers at once
  help               this text
  quit               leave the shell";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    User(UserSelector),
    Query(Query),
    Help,
    Quit,
}

fn parse_count(arg: Option<&str>, default: usize) -> Result<usize> {
    match arg {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow!("expected a number, got '{}'", raw)),
    }
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let parsed = match command.to_ascii_lowercase().as_str() {
        "user" => {
            let raw = arg.ok_or_else(|| anyhow!("usage: user <id|random>"))?;
            ShellCommand::User(raw.parse()?)
        }
        "mean" => ShellCommand::Query(Query::Mean),
        "recs" | "recommend" => {
            ShellCommand::Query(Query::Recommend(parse_count(arg, DEFAULT_RECOMMENDATIONS)?))
        }
        "top" => ShellCommand::Query(Query::Top(parse_count(arg, DEFAULT_RANKED_MOVIES)?)),
        "bottom" => ShellCommand::Query(Query::Bottom(parse_count(arg, DEFAULT_RANKED_MOVIES)?)),
        "accuracy" => ShellCommand::Query(Query::Accuracy),
        "reviews" => ShellCommand::Query(Query::Reviews),
        "summary" => ShellCommand::Query(Query::Summary),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(anyhow!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(parsed))
}

/// Read commands from `input` until `quit` or end of input
///
/// A failing command writes its error to `out`; the loop keeps going.
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    json: bool,
    mut input: R,
    mut out: W,
) -> Result<()> {
    writeln!(out, "{}", "Type 'help' for the list of commands.".dimmed())?;
    loop {
        write!(out, "{} ", "mubi>".cyan().bold())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let outcome = parse_line(&line).and_then(|command| match command {
            None => Ok(true),
            Some(ShellCommand::Quit) => Ok(false),
            Some(ShellCommand::Help) => {
                writeln!(out, "{}", HELP)?;
                Ok(true)
            }
            Some(ShellCommand::User(selector)) => {
                let user = session.set_active_user(selector)?;
                writeln!(
                    out,
                    "{} {}",
                    "Now showing user".green(),
                    user.external_id.to_string().bold()
                )?;
                Ok(true)
            }
            Some(ShellCommand::Query(query)) => {
                run_query(session, query, json, &mut out).map(|_| true)
            }
        });

        match outcome {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => writeln!(out, "{} {}", "error:".red().bold(), e)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Dataset, PredictionRow, RatingEvent, TranslationMap};

    fn create_test_session() -> Session {
        let mut dataset = Dataset::new(3);
        let mut translation = TranslationMap::default();
        translation.external_to_internal.insert(7, 0);
        for movie in 0..3 {
            translation.movie_to_id.insert(movie, movie as u64);
            translation.id_to_title.insert(movie as u64, format!("Film {}", movie));
        }
        dataset.set_translation(translation);
        dataset.insert_rating(RatingEvent { user: 0, movie: 0, score: 4.0 });
        dataset.insert_rating(RatingEvent { user: 0, movie: 1, score: 2.0 });
        dataset.insert_predictions(0, PredictionRow::new(vec![4.2, 3.1, 4.8]));

        let mut session = Session::with_seed(dataset, 3);
        session.set_active_user(UserSelector::Id(7)).unwrap();
        session
    }

    fn run_script(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        run_shell(session, false, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_failing_command_keeps_loop_running() {
        let mut session = create_test_session();
        let output = run_script(&mut session, "recs 99\nreviews\nquit\nreviews\n");

        assert!(output.contains("between 1 and 20, got 99"));
        assert_eq!(output.matches("This user has 2 reviews on record.").count(), 1);
    }

    #[test]
    fn test_unknown_user_keeps_previous_user() {
        let mut session = create_test_session();
        let output = run_script(&mut session, "user 12345\nmean\n");

        assert!(output.contains("12345"));
        assert!(output.contains("This user's average rating is 3.0."));
        assert_eq!(session.active_user().unwrap().external_id, 7);
    }

    #[test]
    fn test_end_of_input_ends_loop() {
        let mut session = create_test_session();
        let output = run_script(&mut session, "dance\nhelp");

        assert!(output.contains("unknown command 'dance'"));
        assert!(output.contains("Commands:"));
    }

    #[test]
    fn test_parse_queries_with_defaults() {
        assert_eq!(
            parse_line("recs").unwrap(),
            Some(ShellCommand::Query(Query::Recommend(5)))
        );
        assert_eq!(
            parse_line("top").unwrap(),
            Some(ShellCommand::Query(Query::Top(10)))
        );
        assert_eq!(
            parse_line("  Bottom 3 ").unwrap(),
            Some(ShellCommand::Query(Query::Bottom(3)))
        );
        assert_eq!(
            parse_line("summary").unwrap(),
            Some(ShellCommand::Query(Query::Summary))
        );
    }

    #[test]
    fn test_parse_user_switch() {
        assert_eq!(
            parse_line("user random").unwrap(),
            Some(ShellCommand::User(UserSelector::Random))
        );
        assert_eq!(
            parse_line("user 43744268").unwrap(),
            Some(ShellCommand::User(UserSelector::Id(43744268)))
        );
        assert!(parse_line("user").is_err());
        assert!(parse_line("user bob").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(parse_line("?").unwrap(), Some(ShellCommand::Help));
        assert!(parse_line("recs many").is_err());
        assert!(parse_line("dance").is_err());
    }
}
