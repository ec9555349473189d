use crate::{
    cmd::create_service,
    modules::{
        config::AppConfig,
        handlers::UserPageParameter,
        user_page::{render::render_page, tab::TAB_PARAM, PageLocation},
    },
};
use anyhow::{Context, Result};
use clap::Args;
use validator::Validate;

#[derive(Debug, Args)]
pub struct RenderArgs {
    user: String,
    #[arg(long)]
    tab: Option<String>,
}

pub async fn run(args: RenderArgs) -> Result<()> {
    let params = UserPageParameter {
        user_id: args.user,
    };
    params.validate().with_context(|| {
        let message = format!("invalid user id `{}`", params.user_id);
        tracing::error!(message);
        message
    })?;

    let config = AppConfig::from_env()?;
    let service = create_service(&config)?;

    let query = match args.tab {
        Some(tab) => Some(serde_urlencoded::to_string([(TAB_PARAM, tab)])?),
        None => None,
    };
    let path = format!("/user/{}", params.user_id);
    let location = PageLocation {
        path: &path,
        query: query.as_deref(),
    };

    let page = service.build(&params.user_id, &location, None).await;
    println!("{}", render_page(&page));

    Ok(())
}
