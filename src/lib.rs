//! Joomla content node
//!
//! Manages articles, categories, tags, media files and custom fields of a
//! Joomla 4/5 site through its Web Services API.
//!
//! ```no_run
//! # async fn run(ctx: &dyn joomla_node::node::NodeContext) -> anyhow::Result<()> {
//! let credentials = joomla_node::joomla::load_from_env()?;
//! let client = joomla_node::joomla::JoomlaClient::from_credentials(credentials)?;
//! let items = joomla_node::node::execute(ctx, &client).await?;
//! # let _ = items;
//! # Ok(())
//! # }
//! ```

pub mod joomla;
pub mod node;
pub mod resource;

#[cfg(test)]
mod test_support;
