use chrono::{DateTime, Utc};

use super::csrf::{check_form_token, form_token, rotate_form_token};
use super::markdown::plan_html;
use super::prelude::*;
use crate::constants::{MAX_ROOM_COUNT, MIN_ROOM_COUNT};
use crate::export::{ExportFormat, export};
use crate::generator::{DesignError, DesignPlan, generate_design};
use crate::preferences::{Preferences, RoomCount, Scenario, Style};
use crate::unsplash::{ReferenceImage, fetch_reference_image};

/// Result of the latest submission, kept in the visitor's session.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct CurrentDesign {
    pub(crate) preferences: Preferences,
    pub(crate) plan: DesignPlan,
    pub(crate) image: ReferenceImage,
    pub(crate) generated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub(crate) struct ChoiceView {
    pub(crate) value: &'static str,
    pub(crate) selected: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct ExportView {
    pub(crate) slug: &'static str,
    pub(crate) label: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub(crate) struct HomeTemplate {
    form_token: String,
    scenarios: Vec<ChoiceView>,
    styles: Vec<ChoiceView>,
    bedrooms: u8,
    bathrooms: u8,
    features: String,
    min_rooms: u8,
    max_rooms: u8,
    has_design: bool,
    plan_html: String,
    style: String,
    has_image: bool,
    image_url: String,
    generated_at: String,
    exports: Vec<ExportView>,
}

#[derive(Deserialize)]
pub(crate) struct GenerateForm {
    form_token: String,
    scenario: Scenario,
    bedrooms: RoomCount,
    bathrooms: RoomCount,
    style: Style,
    #[serde(default)]
    features: String,
}

impl GenerateForm {
    fn into_parts(self) -> (String, Preferences) {
        (
            self.form_token,
            Preferences {
                scenario: self.scenario,
                bedrooms: self.bedrooms,
                bathrooms: self.bathrooms,
                style: self.style,
                features: self.features,
            },
        )
    }
}

#[derive(Deserialize)]
pub(crate) struct ExportForm {
    form_token: String,
}

/// The text shown (and exported) in place of a plan when generation fails.
pub(crate) fn failure_text(err: &DesignError) -> String {
    match err {
        DesignError::EmptyResponse => "Error: Unable to generate design.".to_string(),
        other => format!("API Error: {other}"),
    }
}

/// handles the / GET
pub(crate) async fn home_handler(session: Session) -> Result<HomeTemplate, HomeDesignError> {
    let form_token = form_token(&session).await?.to_string();
    let current = session.get::<CurrentDesign>(CURRENT_DESIGN_KEY).await?;
    let preferences = current
        .as_ref()
        .map(|design| design.preferences.clone())
        .unwrap_or_default();

    let scenarios = Scenario::ALL
        .into_iter()
        .map(|scenario| ChoiceView {
            value: scenario.as_str(),
            selected: scenario == preferences.scenario,
        })
        .collect();
    let styles = Style::ALL
        .into_iter()
        .map(|style| ChoiceView {
            value: style.as_str(),
            selected: style == preferences.style,
        })
        .collect();
    let exports = ExportFormat::ALL
        .into_iter()
        .map(|format| ExportView {
            slug: format.slug(),
            label: format.label(),
        })
        .collect();

    let (plan_html, style, image_url, generated_at) = match &current {
        Some(design) => (
            plan_html(&design.plan.text),
            design.preferences.style.to_string(),
            design.image.url.clone().unwrap_or_default(),
            design.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        None => Default::default(),
    };

    Ok(HomeTemplate {
        form_token,
        scenarios,
        styles,
        bedrooms: preferences.bedrooms.get(),
        bathrooms: preferences.bathrooms.get(),
        features: preferences.features,
        min_rooms: MIN_ROOM_COUNT,
        max_rooms: MAX_ROOM_COUNT,
        has_design: current.is_some(),
        has_image: !image_url.is_empty(),
        plan_html,
        style,
        image_url,
        generated_at,
        exports,
    })
}

/// handles the /generate POST: prompt, plan, image, then back to the page
pub(crate) async fn generate_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GenerateForm>,
) -> Result<Redirect, HomeDesignError> {
    let (token, preferences) = form.into_parts();
    check_form_token(&session, &token).await?;

    info!(
        "Generating design for scenario={} style={}",
        preferences.scenario, preferences.style
    );
    let prompt = preferences.prompt();
    let plan = match generate_design(&state.client, &state.config, &prompt).await {
        Ok(plan) => plan,
        Err(err) => {
            warn!("Design generation failed: {}", err);
            DesignPlan {
                text: failure_text(&err),
            }
        }
    };

    let image =
        match fetch_reference_image(&state.client, &state.config, preferences.style.as_str()).await
        {
            Ok(image) => image,
            Err(err) => {
                warn!("Reference image lookup failed: {}", err);
                ReferenceImage::default()
            }
        };

    session
        .insert(
            CURRENT_DESIGN_KEY,
            CurrentDesign {
                preferences,
                plan,
                image,
                generated_at: Utc::now(),
            },
        )
        .await?;
    rotate_form_token(&session).await?;

    Ok(Redirect::to("/"))
}

/// handles the /export/{format} POST: writes the artifact and sends back
/// the bytes this request rendered
pub(crate) async fn export_handler(
    State(state): State<AppState>,
    session: Session,
    Path(format): Path<String>,
    Form(form): Form<ExportForm>,
) -> Result<Response, HomeDesignError> {
    let format: ExportFormat = format.parse()?;
    check_form_token(&session, &form.form_token).await?;
    let Some(design) = session.get::<CurrentDesign>(CURRENT_DESIGN_KEY).await? else {
        return Err(HomeDesignError::NotFound(format!(
            "no design to export as {}",
            format.slug()
        )));
    };

    let artifact = {
        // one writer at a time so the shared file on disk is never interleaved
        let _guard = state.export_lock.lock().await;
        export(&state.config.export_dir, &design.plan.text, format).await?
    };

    Response::builder()
        .header(CONTENT_TYPE, format.content_type())
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.filename()),
        )
        .body(axum::body::Body::from(artifact.bytes))
        .map_err(HomeDesignError::from)
}
