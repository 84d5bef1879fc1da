//! Stored sign-in session handlers.

use serde::Serialize;

use lectern_config::{SessionData, SessionStore, SessionUser};

use crate::cli::{GlobalOpts, SessionArgs, SessionCommand};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

/// Session as shown to the operator; the token is never printed.
#[derive(Debug, Serialize)]
struct SessionView {
    signed_in: bool,
    token: Option<String>,
    user: Option<SessionUser>,
    path: String,
}

fn mask(token: &str) -> String {
    let tail: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if token.chars().count() <= 8 {
        "****".into()
    } else {
        format!("****{tail}")
    }
}

fn view(store: &SessionStore, data: &SessionData) -> SessionView {
    SessionView {
        signed_in: data.is_signed_in(),
        token: data.auth_token.as_deref().filter(|t| !t.is_empty()).map(mask),
        user: data.auth_user.clone(),
        path: store.path().display().to_string(),
    }
}

fn detail(v: &SessionView) -> String {
    if !v.signed_in {
        return format!("Not signed in ({})", v.path);
    }
    let mut lines = vec![format!("token: {}", v.token.as_deref().unwrap_or("-"))];
    if let Some(ref user) = v.user {
        lines.push(format!("user:  {} <{}>", user.name, user.email));
        if let Some(ref role) = user.role {
            lines.push(format!("role:  {role}"));
        }
    }
    lines.push(format!("file:  {}", v.path));
    lines.join("\n")
}

pub fn handle(args: SessionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = SessionStore::default_location();

    match args.command {
        SessionCommand::Show => {
            let v = view(&store, &store.load());
            let out = output::render_single(&global.output, &v, detail, |v| {
                v.signed_in.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SessionCommand::SetToken { token, name, email } => {
            let token = match token {
                Some(t) => t,
                None => rpassword::prompt_password("Bearer token: ").map_err(prompt_err)?,
            };
            let token = token.trim().to_owned();
            if token.is_empty() {
                return Err(CliError::bad_argument("token", "value cannot be empty"));
            }

            let mut data = store.load();
            data.auth_token = Some(token);
            if name.is_some() || email.is_some() {
                data.auth_user = Some(SessionUser {
                    id: serde_json::Value::Null,
                    name: name.unwrap_or_default(),
                    email: email.unwrap_or_default(),
                    role: None,
                });
            }
            store.save(&data)?;
            if !global.quiet {
                eprintln!("✓ Session saved to {}", store.path().display());
            }
            Ok(())
        }

        SessionCommand::Logout => {
            store.clear()?;
            if !global.quiet {
                eprintln!("✓ Signed out");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_masked() {
        assert_eq!(mask("short"), "****");
        assert_eq!(mask("abcdefghijkl"), "****ijkl");
    }

    #[test]
    fn signed_out_view_names_the_file() {
        let store = SessionStore::new("/tmp/lectern-session.json");
        let v = view(&store, &SessionData::default());
        assert!(!v.signed_in);
        assert!(detail(&v).starts_with("Not signed in"));
    }
}
