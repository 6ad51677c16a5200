//! Terminal dashboard: fill in the survey, see your cluster, tell us if it fits.

use anyhow::{Context, Result};
use cluster_feedback::config::Settings;
use cluster_feedback::core::{Acknowledgement, ClusterId, FeedbackEvent};
use cluster_feedback::effects::{Dispatch, FeedbackEnv, InMemoryNoteStore, NoteStore, Session};
use cluster_feedback::qdrant::QdrantNoteStore;
use cluster_feedback::survey::{
    ChartSink, Classifier, ClusterCatalog, Field, ModeProfileClassifier, Population,
    SurveyRecord, TextChart,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const BAR_WIDTH: usize = 30;

const HELP: &str = "\
Commands:
  set <field> <value>   change an answer (see `options`)
  show                  redraw the dashboard
  match                 the description fits me
  nomatch               the description does not fit me
  comment <text>        write a comment (after `nomatch`)
  submit                send the comment
  reset                 change my answer
  options               list fields and allowed answers
  help                  show this help
  quit                  leave";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cluster_feedback=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let settings = Settings::from_env().context("Invalid configuration")?;

    let catalog = ClusterCatalog::load(&settings.cluster_descriptions)
        .context("Failed to load cluster descriptions")?;
    let population =
        Population::load(&settings.survey_data).context("Failed to load survey data")?;
    let classifier = load_classifier(&settings, &population)?;
    // Every cluster the classifier can answer must be describable.
    for (id, _) in classifier.profiles() {
        catalog
            .describe(id)
            .context("Cluster model and cluster descriptions disagree")?;
    }
    let population = population
        .labeled_by(&classifier)
        .context("Failed to classify survey data")?;
    info!(
        respondents = population.len(),
        clusters = catalog.len(),
        "survey data ready"
    );

    let notes = open_note_store(&settings)?;
    let session = Session::new(FeedbackEnv::new(notes), settings.comment_rules());

    let mut dashboard = Dashboard {
        record: SurveyRecord::default(),
        session,
        classifier,
        catalog,
        population,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    dashboard.rerun(&mut out)?;
    writeln!(out, "Type `help` for commands.")?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        match dashboard.handle(line.trim(), &mut out)? {
            Flow::Continue => {}
            Flow::Quit => break,
        }
    }

    let history = dashboard.session.history();
    debug!(session = %dashboard.session.id(), path = ?history.path(), "stages visited");
    info!(
        session = %dashboard.session.id(),
        changes = history.changes().len(),
        clusters = history.clusters().len(),
        duration_secs = history.duration().map(|d| d.as_secs()).unwrap_or(0),
        "session ended"
    );
    Ok(())
}

fn load_classifier(settings: &Settings, population: &Population) -> Result<ModeProfileClassifier> {
    if settings.cluster_model.exists() {
        return ModeProfileClassifier::load(&settings.cluster_model)
            .context("Failed to load cluster model");
    }
    warn!(
        path = %settings.cluster_model.display(),
        "cluster model not found, fitting profiles from labeled survey data"
    );
    let model = ModeProfileClassifier::fit(population).context("Failed to fit cluster model")?;
    // A model that cannot be written is still usable for this run.
    if let Err(err) = model.save(&settings.cluster_model) {
        warn!(error = %err, "fitted cluster model not saved");
    }
    Ok(model)
}

fn open_note_store(settings: &Settings) -> Result<Arc<dyn NoteStore>> {
    match settings.note_store.qdrant_config() {
        Some(config) => {
            let url = config.url.clone();
            let store = QdrantNoteStore::connect(config).context("Failed to connect to Qdrant")?;
            info!(%url, collection = store.collection(), "note store connected");
            Ok(Arc::new(store))
        }
        None => {
            warn!("QDRANT_URL not set, feedback comments are kept in memory only");
            Ok(Arc::new(InMemoryNoteStore::new()))
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Dashboard {
    record: SurveyRecord,
    session: Session,
    classifier: ModeProfileClassifier,
    catalog: ClusterCatalog,
    population: Population,
}

impl Dashboard {
    fn handle(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        let event = match command {
            "" => return Ok(Flow::Continue),
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => {
                writeln!(out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
            "options" => {
                print_options(out)?;
                return Ok(Flow::Continue);
            }
            "show" => None,
            "set" => {
                self.set_answer(rest, out)?;
                None
            }
            "match" => Some(FeedbackEvent::ChooseMatches),
            "nomatch" => Some(FeedbackEvent::ChooseDoesNotMatch),
            "comment" => Some(FeedbackEvent::EditComment(rest.to_string())),
            "submit" => Some(FeedbackEvent::SubmitComment),
            "reset" => Some(FeedbackEvent::Reset),
            other => {
                writeln!(out, "Unknown command '{other}'. Type `help` for commands.")?;
                return Ok(Flow::Continue);
            }
        };

        if let Some(event) = event {
            self.feedback(event, out)?;
        }
        self.rerun(out)?;
        Ok(Flow::Continue)
    }

    fn set_answer(&mut self, args: &str, out: &mut impl Write) -> Result<()> {
        let (field, value) = args.split_once(' ').unwrap_or((args, ""));
        let outcome = field
            .parse::<Field>()
            .and_then(|field| self.record.set(field, value.trim()));
        if let Err(err) = outcome {
            writeln!(out, "{err}")?;
        }
        Ok(())
    }

    fn feedback(&mut self, event: FeedbackEvent, out: &mut impl Write) -> Result<()> {
        match self.session.dispatch(event) {
            Ok(Dispatch::Rejected(violations)) => {
                for violation in violations.iter() {
                    writeln!(out, "Warning: {violation}")?;
                }
            }
            Ok(Dispatch::Ignored { guard }) => {
                writeln!(out, "Not available right now ({guard}).")?;
            }
            Ok(_) => {}
            Err(err) => {
                // Only the feedback panel fails; the rest of the dashboard still renders.
                error!(session = %self.session.id(), error = %err, "feedback not saved");
                writeln!(out, "Your feedback could not be saved: {err}")?;
            }
        }
        Ok(())
    }

    /// Classify the current answers, assign the cluster, and draw everything.
    fn rerun(&mut self, out: &mut impl Write) -> Result<()> {
        let cluster = self
            .classifier
            .classify(&self.record)
            .context("Failed to classify your answers")?;
        self.session.assign_cluster(cluster.clone())?;
        self.render(&cluster, out)
    }

    fn render(&self, cluster: &ClusterId, out: &mut impl Write) -> Result<()> {
        let description = self.catalog.describe(cluster)?;

        writeln!(out)?;
        writeln!(out, "== Your closest group: {} ==", description.name)?;
        writeln!(out, "{}", description.description)?;
        writeln!(out)?;
        self.render_feedback(out)?;

        let members = self.population.members(cluster);
        writeln!(out)?;
        writeln!(out, "People in your group: {}", members.len())?;
        writeln!(out)?;

        let mut chart = TextChart::new(&mut *out, BAR_WIDTH);
        for field in Field::ALL {
            chart.render(&members.histogram(field))?;
        }
        chart.render(&self.population.cluster_sizes(&self.catalog)?)?;
        Ok(())
    }

    fn render_feedback(&self, out: &mut impl Write) -> Result<()> {
        let view = self.session.view();

        writeln!(out, "Does this description fit you?")?;
        if view.choices_offered {
            writeln!(out, "  [match] it fits me   [nomatch] it does not fit me")?;
        }
        match view.acknowledgement {
            Some(Acknowledgement::Agreed) => {
                writeln!(out, "  You chose: the description fits me.")?;
                writeln!(out, "  Thanks for the feedback, glad we got it right!")?;
            }
            Some(Acknowledgement::Disagreed) => {
                writeln!(out, "  You chose: the description does not fit me.")?;
                writeln!(out, "  Thanks for the feedback. Help us improve by adding a comment!")?;
            }
            Some(Acknowledgement::ThankYou) => {
                writeln!(out, "  Thanks for the extra remarks, your feedback was saved.")?;
            }
            None => {}
        }
        if view.comment_input_shown {
            match &view.comment_draft {
                Some(draft) => writeln!(out, "  Comment: {draft}")?,
                None => writeln!(out, "  Comment: (empty, use `comment <text>`)")?,
            }
            writeln!(out, "  [submit] send comment")?;
        }
        if view.reset_offered {
            writeln!(out, "  [reset] change my answer")?;
        }
        Ok(())
    }
}

fn print_options(out: &mut impl Write) -> io::Result<()> {
    for field in Field::ALL {
        writeln!(out, "  {} ({}): {}", field, field.label(), field.options().join(", "))?;
    }
    Ok(())
}
