mod article_steps;
mod auth_steps;
mod comment_steps;
mod response_steps;
