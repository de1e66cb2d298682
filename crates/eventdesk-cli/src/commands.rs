use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use eventdesk_core::api::{ApiClient, ApiError};
use eventdesk_core::auth::{CredentialStore, Session};
use eventdesk_core::cache::CacheManager;
use eventdesk_core::config::Config;
use eventdesk_core::eligibility::{
    can_be_main_organizer, can_be_main_organizer_today, required_qualifications, CategoryTree,
};
use eventdesk_core::models::{Event, Paginated, QualificationCategory, User};
use eventdesk_core::{Locale, Renderer, TranslationCatalog};

use crate::output;

/// Category files may hold the bare list or a saved paginated response.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryFile {
    List(Vec<QualificationCategory>),
    Page(Paginated<QualificationCategory>),
}

impl CategoryFile {
    fn into_categories(self) -> Vec<QualificationCategory> {
        match self {
            CategoryFile::List(categories) => categories,
            CategoryFile::Page(page) => page.results,
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_categories(path: &Path) -> Result<Vec<QualificationCategory>> {
    Ok(read_json::<CategoryFile>(path)?.into_categories())
}

pub fn requirements(event_path: &Path) -> Result<()> {
    let event: Event = read_json(event_path)?;
    let classification = event.classification();
    let required = required_qualifications(&classification);
    output::requirements(&event, &required);
    Ok(())
}

/// Returns whether the user is eligible
pub fn check(
    event_path: &Path,
    user_path: &Path,
    categories_path: &Path,
    today: Option<NaiveDate>,
    locale: Locale,
) -> Result<bool> {
    let event: Event = read_json(event_path)?;
    let user: User = read_json(user_path)?;
    let tree = CategoryTree::new(read_categories(categories_path)?)?;
    Ok(evaluate(&event, &user, &tree, today, locale))
}

fn evaluate(
    event: &Event,
    user: &User,
    tree: &CategoryTree,
    today: Option<NaiveDate>,
    locale: Locale,
) -> bool {
    let classification = event.classification();
    let decision = match today {
        Some(today) => can_be_main_organizer(&classification, user, tree, today, locale),
        None => can_be_main_organizer_today(&classification, user, tree, locale),
    };
    output::decision(event, user, &decision, locale);
    decision.is_ok()
}

/// Where the record to render comes from
pub enum RecordSource {
    File(PathBuf),
    Event(i64),
    User(i64),
}

impl RecordSource {
    /// Translation model of a fetched record
    fn model(&self) -> Option<&'static str> {
        match self {
            RecordSource::File(_) => None,
            RecordSource::Event(_) => Some("event"),
            RecordSource::User(_) => Some("user"),
        }
    }
}

pub struct RenderOptions {
    pub translations: Vec<PathBuf>,
    pub generic: Option<PathBuf>,
    pub model: Option<String>,
    pub html: bool,
}

pub async fn render(
    config: &Config,
    source: RecordSource,
    options: RenderOptions,
    locale: Locale,
) -> Result<()> {
    let model = options.model.as_deref().or(source.model());
    let local_translations = !options.translations.is_empty() || options.generic.is_some();

    let (value, mut catalog) = match &source {
        RecordSource::File(path) => (read_json::<Value>(path)?, TranslationCatalog::new()),
        remote => {
            let client = authenticated_client(config).await?;
            if local_translations {
                (fetch_record(&client, remote).await?, TranslationCatalog::new())
            } else {
                let cache = CacheManager::new(config.cache_dir()?)?;
                tokio::try_join!(
                    fetch_record(&client, remote),
                    backend_translations(&client, &cache)
                )?
            }
        }
    };

    for path in &options.translations {
        catalog.load_models_file(path)?;
    }
    if let Some(path) = &options.generic {
        catalog.load_generic_file(path)?;
    }

    let renderer = Renderer::from_catalog(&catalog, locale);
    let node = match model {
        Some(model) => renderer.render_model(&value, model),
        None => renderer.render(&value, None, 0),
    };

    if options.html {
        println!("{}", node.to_html());
    } else {
        if let Some(model) = model {
            output::title(catalog.model_label(model));
        }
        println!("{}", node.to_plain_text());
    }
    Ok(())
}

async fn fetch_record(client: &ApiClient, source: &RecordSource) -> Result<Value> {
    match source {
        RecordSource::File(path) => read_json(path),
        RecordSource::Event(id) => client.fetch_event_raw(*id).await,
        RecordSource::User(id) => client.fetch_user_raw(*id).await,
    }
}

/// Backend translation dictionaries, cached like the categories
async fn backend_translations(
    client: &ApiClient,
    cache: &CacheManager,
) -> Result<TranslationCatalog> {
    match cache.load_translations() {
        Ok(Some(cached)) if !cached.is_stale() => return Ok(cached.data),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable translation cache"),
    }

    let catalog = client.fetch_translations().await?;
    if let Err(e) = cache.save_translations(&catalog) {
        warn!(error = %e, "Failed to cache translations");
    }
    Ok(catalog)
}

pub async fn login(config: &mut Config, email: &str) -> Result<()> {
    let password = rpassword::prompt_password(format!("Password for {}: ", email))
        .context("Failed to read password")?;

    let client = ApiClient::new(&config.api_url())?;
    let session_data = client.login(email, &password).await?;
    info!(email, user_id = session_data.user_id, "Logged in");

    let mut session = Session::new(config.cache_dir()?);
    session.update(session_data);
    session.save()?;

    // Keychain access can be unavailable (headless systems); the session
    // alone still works until it expires.
    if let Err(e) = CredentialStore::store(email, &password) {
        warn!(error = %e, "Could not store password in keychain");
    }

    config.last_email = Some(email.to_string());
    config.save()?;

    output::success(&format!("Logged in as {}", email));
    Ok(())
}

pub fn logout(config: &mut Config) -> Result<()> {
    let cache_dir = config.cache_dir()?;
    Session::new(cache_dir.clone()).clear()?;
    CacheManager::new(cache_dir)?.clear()?;

    if let Some(email) = config.last_email.take() {
        if let Err(e) = CredentialStore::delete(&email) {
            debug!(error = %e, "No keychain entry to delete");
        }
        config.save()?;
    }

    output::success("Logged out");
    Ok(())
}

/// Authenticated client from the stored session. A session that has
/// expired or is close to expiry is renewed with the keychain password; when
/// renewal is impossible a still-valid token is used until it runs out.
async fn authenticated_client(config: &Config) -> Result<ApiClient> {
    let client = ApiClient::new(&config.api_url())?;
    let mut session = Session::new(config.cache_dir()?);
    session.load()?;

    if let Some(token) = session.fresh_token(client.base_url()) {
        debug!("Using stored session");
        return Ok(client.with_token(token.to_string()));
    }

    let current = session
        .data
        .as_ref()
        .filter(|d| d.api_url == client.base_url() && !d.is_expired())
        .map(|d| (d.token.clone(), d.minutes_until_expiry()));

    let stored = config.last_email.as_deref().and_then(|email| {
        CredentialStore::get_password(email)
            .map_err(|e| debug!(error = %e, "No stored password"))
            .ok()
            .map(|password| (email, password))
    });

    let Some((email, password)) = stored else {
        return match current {
            Some((token, minutes_left)) => {
                warn!(minutes_left, "Session expires soon and cannot be renewed");
                Ok(client.with_token(token))
            }
            None => anyhow::bail!(
                "Not logged in or session expired. Run `eventdesk login --email <EMAIL>`."
            ),
        };
    };

    info!(email, "Renewing session");
    match client.login(email, &password).await {
        Ok(data) => {
            let token = data.token.clone();
            session.update(data);
            session.save()?;
            Ok(client.with_token(token))
        }
        Err(e) => match current {
            Some((token, minutes_left)) => {
                warn!(error = %e, minutes_left, "Session renewal failed, using current token");
                Ok(client.with_token(token))
            }
            None => Err(e),
        },
    }
}

/// Qualification categories from the cache, fetched when missing or stale
async fn qualification_categories(
    client: &ApiClient,
    cache: &CacheManager,
) -> Result<Vec<QualificationCategory>> {
    match cache.load_qualification_categories() {
        Ok(Some(cached)) if !cached.is_stale() => return Ok(cached.data),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable category cache"),
    }

    let categories = client.fetch_qualification_categories().await?;
    if let Err(e) = cache.save_qualification_categories(&categories) {
        warn!(error = %e, "Failed to cache qualification categories");
    }
    Ok(categories)
}

/// Returns whether the user is eligible
pub async fn check_remote(
    config: &Config,
    event_id: i64,
    user_id: i64,
    refresh: bool,
    today: Option<NaiveDate>,
    locale: Locale,
) -> Result<bool> {
    let client = authenticated_client(config).await?;
    let cache = CacheManager::new(config.cache_dir()?)?;

    let fetched = if refresh {
        client.fetch_organizer_inputs(event_id, user_id).await.map(|inputs| {
            if let Err(e) = cache.save_qualification_categories(&inputs.categories) {
                warn!(error = %e, "Failed to cache qualification categories");
            }
            (inputs.event, inputs.user, inputs.categories)
        })
    } else {
        tokio::try_join!(
            client.fetch_event(event_id),
            client.fetch_user(user_id),
            qualification_categories(&client, &cache),
        )
    };
    let (event, user, categories) = match fetched {
        Ok(inputs) => inputs,
        Err(e) if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_auth_error) => {
            // The backend no longer accepts the stored token
            Session::new(config.cache_dir()?).clear()?;
            return Err(e.context("Session rejected by the backend. Run `eventdesk login` again."));
        }
        Err(e) => return Err(e),
    };

    let tree = CategoryTree::new(categories)?;
    Ok(evaluate(&event, &user, &tree, today, locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_temp(name: &str, value: &Value) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("eventdesk-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_category_file_accepts_list_and_page() {
        let category = json!({"id": 1, "slug": "organizer", "name": "Organizátor", "parents": []});
        let list = write_temp("categories_list.json", &json!([category]));
        let page = write_temp(
            "categories_page.json",
            &json!({"count": 1, "next": null, "results": [category]}),
        );

        assert_eq!(read_categories(&list).unwrap().len(), 1);
        assert_eq!(read_categories(&page).unwrap()[0].slug, "organizer");
    }

    #[test]
    fn test_check_from_files() {
        let event = write_temp(
            "event.json",
            &json!({
                "id": 1,
                "name": "Tábor",
                "category": {"id": 1, "name": "Dobrovolnická", "slug": "public__volunteering"},
                "group": {"id": 2, "name": "Tábor", "slug": "camp"},
                "intended_for": {"id": 3, "name": "Pro všechny", "slug": "for_all"}
            }),
        );
        let user = write_temp(
            "user.json",
            &json!({
                "id": 7,
                "display_name": "Jana",
                "birthday": "1990-01-01",
                "qualifications": [{
                    "category": {
                        "id": 2,
                        "slug": "instructor",
                        "name": "Instruktor",
                        "parents": [1]
                    },
                    "valid_since": "2020-01-01",
                    "valid_till": "2030-01-01"
                }]
            }),
        );
        let categories = write_temp(
            "categories.json",
            &json!([
                {"id": 1, "slug": "organizer", "name": "Organizátor", "parents": []},
                {"id": 2, "slug": "instructor", "name": "Instruktor", "parents": [1]}
            ]),
        );

        let today = NaiveDate::from_ymd_opt(2024, 9, 1);
        assert!(check(&event, &user, &categories, today, Locale::En).unwrap());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = PathBuf::from("/nonexistent/eventdesk/event.json");
        assert!(requirements(&missing).is_err());
    }
}
