//! `cockpit wizard` — Write a blog article step by step.
//!
//! Drives an `ArticleWizard` directly: every intent that needs the model
//! is executed right away and the result shown before the next prompt.

use std::sync::Arc;

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};

use cockpit_core::config::CockpitConfig;
use cockpit_core::gateway::GenerationGateway;
use cockpit_core::models::{Step, StepState};
use cockpit_core::workflow::{
    self, ArticleWizard, Completion, Dispatch, RevisionMode, WizardError, WizardSnapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Accept,
    Revise,
    Retry,
    Restart,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::Accept => "Akzeptieren & weiter",
            Action::Revise => "Überarbeiten",
            Action::Retry => "Erneut versuchen",
            Action::Restart => "Neu starten",
            Action::Quit => "Beenden",
        }
    }
}

pub async fn run(
    config: &CockpitConfig,
    gateway: Arc<dyn GenerationGateway>,
    topic: Option<String>,
) -> Result<(), String> {
    let theme = ColorfulTheme::default();
    let mut wizard = ArticleWizard::new(config.internal_links.clone());
    let mut pending_topic = topic;

    println!("{}", style("Content Cockpit — Blogartikel-Assistent").bold());
    println!("══════════════════════════════════════");

    loop {
        if wizard.step().is_initial() {
            let topic = match pending_topic.take() {
                Some(topic) => topic,
                None => Input::<String>::with_theme(&theme)
                    .with_prompt("Thema des Blogartikels")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| format!("Failed to read input: {}", e))?,
            };
            match wizard.start(&topic) {
                Ok(dispatch) => drive(&mut wizard, gateway.as_ref(), dispatch).await,
                Err(err) => report(&err),
            }
            continue;
        }

        let snapshot = wizard.snapshot();
        render(&snapshot);

        let actions = actions_for(&snapshot);
        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt("Wie möchten Sie fortfahren?")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| format!("Failed to read selection: {}", e))?;

        match actions[choice] {
            Action::Accept => match wizard.accept() {
                Ok(dispatch) => drive(&mut wizard, gateway.as_ref(), dispatch).await,
                Err(err) => report(&err),
            },
            Action::Retry => match wizard.retry() {
                Ok(dispatch) => drive(&mut wizard, gateway.as_ref(), dispatch).await,
                Err(err) => report(&err),
            },
            Action::Revise => {
                if let Err(err) = wizard.toggle_editing() {
                    report(&err);
                    continue;
                }
                let feedback = Input::<String>::with_theme(&theme)
                    .with_prompt("Ihr Feedback")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| format!("Failed to read input: {}", e))?;
                match wizard.submit_feedback(&feedback) {
                    Ok(dispatch) => drive(&mut wizard, gateway.as_ref(), dispatch).await,
                    Err(err) => report(&err),
                }
                // Leave the editor on cancel or failure.
                if wizard.revision_mode() == RevisionMode::Editing {
                    wizard.toggle_editing().map_err(|e| e.to_string())?;
                }
            }
            Action::Restart => {
                wizard.reset();
                println!("{}", style("Der Assistent wurde zurückgesetzt.").dim());
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

async fn drive(wizard: &mut ArticleWizard, gateway: &dyn GenerationGateway, dispatch: Dispatch) {
    let operation = dispatch.request.operation();
    println!("{}", style(format!("… {} läuft", operation)).dim());
    let (ticket, outcome) = workflow::execute(gateway, dispatch).await;
    if let Completion::Failed(message) = wizard.complete(ticket, outcome) {
        println!("{} {}", style("✗").red(), message);
    }
}

fn report(err: &WizardError) {
    println!("{} {}", style("!").yellow(), err);
}

fn actions_for(snapshot: &WizardSnapshot) -> Vec<Action> {
    let mut actions = Vec::new();
    if snapshot.step == Step::Completed {
        if snapshot.production_artifact.is_none() {
            actions.push(Action::Retry);
        }
    } else if snapshot.draft.is_some() {
        actions.push(Action::Accept);
        actions.push(Action::Revise);
    } else {
        actions.push(Action::Retry);
    }
    actions.push(Action::Restart);
    actions.push(Action::Quit);
    actions
}

fn progress_line(snapshot: &WizardSnapshot) -> String {
    snapshot
        .progress
        .iter()
        .map(|p| match p.state {
            StepState::Done => format!("✓ {}", p.label),
            StepState::Current => format!("[{}]", p.label),
            StepState::Pending => p.label.to_string(),
        })
        .collect::<Vec<_>>()
        .join("  ›  ")
}

fn render(snapshot: &WizardSnapshot) {
    println!();
    println!("{}", style(progress_line(snapshot)).dim());
    println!("{}", style(&snapshot.step_title).bold().cyan());
    println!("──────────────────────────────────────");

    if snapshot.step == Step::Completed {
        if let Some(article) = &snapshot.final_article {
            println!("{}", article);
        }
        match &snapshot.production_artifact {
            Some(html) => {
                println!("{}", style("Produktions-Paket").bold());
                println!("{}", html);
            }
            None => println!("{}", style("Das Produktions-Paket fehlt noch.").yellow()),
        }
    } else if let Some(draft) = &snapshot.draft {
        println!("{}", draft);
        if snapshot.step == Step::Research && !snapshot.citations.is_empty() {
            println!();
            println!("{}", style("Quellen").bold());
            for citation in &snapshot.citations {
                println!("{}", citation.list_line());
            }
        }
    }

    if let Some(error) = &snapshot.error {
        println!("{} {}", style("Fehler:").red().bold(), error);
    }
}
