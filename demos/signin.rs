//!
//! This example walks the Sign In with LinkedIn flow end to end: requesting access to
//! the member's lite profile and email address, exchanging the authorization code
//! locally, and fetching the signed-in member's records.
//!
//! Before running it, register an application in the LinkedIn developer portal and
//! add your redirect URL to it.
//!
//! In order to run the example call:
//!
//! ```sh
//! LINKEDIN_CLIENT_ID=xxx LINKEDIN_CLIENT_SECRET=yyy \
//! LINKEDIN_REDIRECT_URL=https://example.com/oauth/callback \
//! cargo run --example signin --features reqwest-blocking
//! ```
//!
//! ...and follow the instructions.
//!

use linkedin_oauth2::{
    default_blocking_http_client, Client, ClientId, ClientSecret, CsrfToken, NavigationDecision,
    RedirectInterceptor, RedirectUrl, Scope,
};

use std::env;
use std::io::{self, BufRead};

fn main() -> anyhow::Result<()> {
    let client_id = ClientId::new(
        env::var("LINKEDIN_CLIENT_ID").expect("Missing the LINKEDIN_CLIENT_ID environment variable."),
    );
    let client_secret = ClientSecret::new(
        env::var("LINKEDIN_CLIENT_SECRET")
            .expect("Missing the LINKEDIN_CLIENT_SECRET environment variable."),
    );
    let redirect_url = RedirectUrl::new(
        env::var("LINKEDIN_REDIRECT_URL")
            .expect("Missing the LINKEDIN_REDIRECT_URL environment variable."),
    )?;

    let client = Client::new(client_id)
        .set_client_secret(client_secret)
        .set_redirect_uri(redirect_url.clone());

    let (authorize_url, csrf_state) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::LiteProfile)
        .add_scope(Scope::EmailAddress)
        .url()?;

    println!("Open this URL in your browser:\n{authorize_url}\n");
    println!("After signing in, paste the full redirect URL here:");

    // In a GUI shell the interceptor is fed every candidate navigation of the
    // embedded web view; here the pasted URL stands in for that callback.
    let mut interceptor = RedirectInterceptor::new(redirect_url, csrf_state);

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let code = match interceptor.intercept(line.trim()) {
        NavigationDecision::PassThrough => {
            anyhow::bail!("that URL does not target the redirect URL")
        }
        NavigationDecision::Completed(outcome) => outcome?,
    };

    let http_client = default_blocking_http_client()?;

    let token = client.exchange_code(code).request(&http_client)?;
    println!("Access token expires at {}", token.expires_at());

    let mut profile = client
        .lite_profile(token.access_token())
        .request(&http_client)?;
    println!(
        "Signed in as {} {} ({})",
        profile.first_name.text, profile.last_name.text, profile.id
    );

    let email = client
        .email_address(token.access_token())
        .request(&http_client)?;
    println!("Email address: {email}");

    let picture_url = client
        .resolve_display_image(&mut profile.profile_picture, token.access_token())
        .request(&http_client)?;
    println!("Profile picture: {picture_url}");

    Ok(())
}
