use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const LOGIN_PATH: &str = "/api/api_login.php";
pub const POST_PATH: &str = "/api/api_post.php";

const VALID_EXPIRATIONS: [&str; 9] = ["N", "10M", "1H", "1D", "1W", "2W", "1M", "6M", "1Y"];

pub type Form = HashMap<String, String>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paste {
    pub key: String,
    pub owner: Option<String>,
    pub name: String,
    pub code: String,
    pub expire: String,
    pub private: String,
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: HashMap<String, String>,
    /// session key -> username
    pub sessions: HashMap<String, String>,
    pub pastes: HashMap<String, Paste>,
    /// Every form received, in arrival order.
    pub forms: Vec<Form>,
}

impl Store {
    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users.insert(username.to_string(), password.to_string());
        self
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_db(Db::default())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route(LOGIN_PATH, post(login))
        .route(POST_PATH, post(post_api))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

type Reply = (StatusCode, String);

fn ok(body: impl Into<String>) -> Reply {
    (StatusCode::OK, body.into())
}

/// The real API answers bad input with 200 and a sentence like this.
fn bad_request(reason: &str) -> Reply {
    ok(format!("Bad API request, {reason}"))
}

async fn read_form(mut multipart: Multipart) -> Result<Form, Reply> {
    let mut form = Form::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        form.insert(name, value);
    }
    Ok(form)
}

fn is_key(s: &str) -> bool {
    s.len() == 32 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn field<'a>(form: &'a Form, name: &str) -> &'a str {
    form.get(name).map(String::as_str).unwrap_or("")
}

async fn login(State(db): State<Db>, multipart: Multipart) -> Reply {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(reply) => return reply,
    };
    let mut store = db.write().await;
    store.forms.push(form.clone());

    if !is_key(field(&form, "api_dev_key")) {
        return bad_request("invalid api_dev_key");
    }
    let username = field(&form, "api_user_name");
    let password = field(&form, "api_user_password");
    if store.users.get(username).map(String::as_str) != Some(password) || password.is_empty() {
        return bad_request("invalid login");
    }

    let session = Uuid::new_v4().simple().to_string();
    store.sessions.insert(session.clone(), username.to_string());
    ok(session)
}

async fn post_api(State(db): State<Db>, multipart: Multipart) -> Reply {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(reply) => return reply,
    };
    let mut store = db.write().await;
    store.forms.push(form.clone());

    if !is_key(field(&form, "api_dev_key")) {
        return bad_request("invalid api_dev_key");
    }
    let user_key = field(&form, "api_user_key");
    let user = if user_key.is_empty() {
        None
    } else {
        match store.sessions.get(user_key) {
            Some(user) => Some(user.clone()),
            None => return bad_request("invalid api_user_key"),
        }
    };

    match field(&form, "api_option") {
        "paste" => create_paste(&mut store, &form, user),
        "delete" => delete_paste(&mut store, &form, user),
        "list" => list_pastes(&store, &form, user),
        _ => bad_request("invalid api_option"),
    }
}

fn create_paste(store: &mut Store, form: &Form, user: Option<String>) -> Reply {
    let code = field(form, "api_paste_code");
    if code.is_empty() {
        return bad_request("api_paste_code was empty");
    }
    let expire = field(form, "api_paste_expire_date");
    if !expire.is_empty() && !VALID_EXPIRATIONS.contains(&expire) {
        return bad_request("invalid api_paste_expire_date");
    }
    let private = match field(form, "api_paste_private") {
        "" => "0",
        p @ ("0" | "1" | "2") => p,
        _ => return bad_request("invalid api_paste_private"),
    };
    if private == "2" && user.is_none() {
        return bad_request("invalid api_paste_private");
    }

    let key = Uuid::new_v4().simple().to_string()[..8].to_string();
    store.pastes.insert(
        key.clone(),
        Paste {
            key: key.clone(),
            owner: user,
            name: field(form, "api_paste_name").to_string(),
            code: code.to_string(),
            expire: expire.to_string(),
            private: private.to_string(),
        },
    );
    ok(format!("https://pastebin.com/{key}"))
}

fn delete_paste(store: &mut Store, form: &Form, user: Option<String>) -> Reply {
    let Some(user) = user else {
        return bad_request("invalid api_user_key");
    };
    let key = field(form, "api_paste_key");
    let owned = store
        .pastes
        .get(key)
        .is_some_and(|p| p.owner.as_deref() == Some(user.as_str()));
    if !owned {
        return bad_request("invalid permission to remove paste");
    }
    store.pastes.remove(key);
    ok("Paste Removed")
}

fn list_pastes(store: &Store, form: &Form, user: Option<String>) -> Reply {
    let Some(user) = user else {
        return bad_request("invalid api_user_key");
    };
    let limit: usize = match field(form, "api_results_limit") {
        "" => 50,
        raw => match raw.parse() {
            Ok(n) if (1..=1000).contains(&n) => n,
            _ => return bad_request("invalid api_results_limit"),
        },
    };

    let mut owned: Vec<&Paste> = store
        .pastes
        .values()
        .filter(|p| p.owner.as_deref() == Some(user.as_str()))
        .collect();
    if owned.is_empty() {
        return ok("No pastes found.");
    }
    owned.sort_by(|a, b| a.key.cmp(&b.key));

    let body = owned
        .into_iter()
        .take(limit)
        .map(|p| {
            format!(
                "<paste>\r\n<paste_key>{}</paste_key>\r\n<paste_title>{}</paste_title>\r\n<paste_size>{}</paste_size>\r\n<paste_expire_date>{}</paste_expire_date>\r\n<paste_private>{}</paste_private>\r\n<paste_url>https://pastebin.com/{}</paste_url>\r\n</paste>\r\n",
                p.key,
                p.name,
                p.code.len(),
                p.expire,
                p.private,
                p.key
            )
        })
        .collect::<String>();
    ok(body)
}
