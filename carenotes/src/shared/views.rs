use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
};
use minijinja::{Environment, Error};

#[derive(Debug, Clone)]
pub struct Views {
    pub env: Arc<Environment<'static>>,
}

impl Views {
    pub fn new(env: Environment<'static>) -> Self {
        let engine = Arc::new(env);
        Self { env: engine }
    }
}

impl Views {
    /// Renders `template.html` or a single block with `template.html#block`.
    pub fn response<D: serde::Serialize>(&self, key: &str, data: D) -> Response {
        match self.render(key, data) {
            Ok(x) => Html(x).into_response(),
            Err(err) => {
                tracing::error!("failed to render {key}: {err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }

    pub fn render<D: serde::Serialize>(&self, key: &str, data: D) -> Result<String, Error> {
        if let Some((template_name, block_name)) = key.split_once('#') {
            let template = self.env.get_template(template_name)?;
            let mut captured = template.render_captured(&data)?;
            let rendered = captured.with_state_mut(|state| state.render_block(block_name))?;

            return Ok(rendered);
        }

        let template = self.env.get_template(key)?;
        let rendered = template.render(&data)?;

        Ok(rendered)
    }
}

impl<ApplicationState> FromRequestParts<ApplicationState> for Views
where
    Self: FromRef<ApplicationState>,
    ApplicationState: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_: &mut Parts, state: &ApplicationState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_ref(state))
    }
}

#[cfg(test)]
mod tests {
    use minijinja::context;

    use super::*;

    fn views() -> Views {
        let mut env = Environment::new();
        env.add_template("page.html", "<main>{% block body %}{{ name }}{% endblock %}</main>")
            .unwrap();
        Views::new(env)
    }

    #[test]
    fn renders_whole_template_and_blocks() {
        let views = views();

        assert_eq!(views.render("page.html", context! { name => "Alice" }).unwrap(), "<main>Alice</main>");
        assert_eq!(views.render("page.html#body", context! { name => "Alice" }).unwrap(), "Alice");
    }

    #[test]
    fn escapes_html() {
        let views = views();

        let rendered = views.render("page.html#body", context! { name => "<b>" }).unwrap();
        assert_eq!(rendered, "&lt;b&gt;");
    }

    #[test]
    fn missing_template_is_server_error() {
        let response = views().response("nope.html", context! {});
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
