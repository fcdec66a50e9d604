use std::path::Path;

use anyhow::Context;
use tracing::info;

use nsconf_auth::{
    AccessPolicy, AccessState, AppGate, AppView, AuthSnapshot, Identity, IdentityProvider,
    RouteGuard, StaticProvider,
};
use nsconf_core::AppConfig;

/// Provider for the CLI: signed in with the claims file, signed out without one.
pub fn load_provider(config: &AppConfig, claims: Option<&Path>) -> anyhow::Result<StaticProvider> {
    let provider = match claims {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read claims {}", path.display()))?;
            StaticProvider::from_claims_json(&json)?
        }
        None => StaticProvider::new(AuthSnapshot::signed_out()),
    };
    Ok(provider.with_authority(config.oidc.authority.clone()))
}

/// Run the application gate and route guard once. Returns the signed-in
/// identity when access is granted.
pub async fn authorize(config: &AppConfig, provider: &StaticProvider) -> anyhow::Result<Identity> {
    let snapshot = provider.snapshot();
    match AppGate.view(&snapshot) {
        AppView::Loading => anyhow::bail!("Loading authentication..."),
        AppView::Error(e) => {
            eprintln!("{}", e.title());
            eprintln!("  {}", e.user_message());
            if let Some(hint) = e.hint() {
                eprintln!("  {hint}");
            }
            return Err(e.into());
        }
        AppView::Ready => {}
    }

    let policy = AccessPolicy::from(&config.access);
    let mut guard = RouteGuard::new(policy);
    let decision = guard.observe(&snapshot);
    if decision.request_signin {
        provider.signin_redirect().await?;
    }

    match (decision.state, snapshot.user) {
        (AccessState::Authorized, Some(user)) => {
            info!(user = user.display_name().unwrap_or("-"), "access granted");
            Ok(user)
        }
        (AccessState::Unauthorized, _) => anyhow::bail!(
            "Access denied: membership in {} is required",
            config.access.required_group
        ),
        _ => anyhow::bail!(
            "Not signed in. Redirecting to login... ({})",
            config.oidc.authority
        ),
    }
}

pub async fn auth(config: &AppConfig, claims: Option<&Path>) -> anyhow::Result<()> {
    let provider = load_provider(config, claims)?;
    let snapshot = provider.snapshot();
    let policy = AccessPolicy::from(&config.access);

    let mut guard = RouteGuard::new(policy.clone());
    let decision = guard.observe(&snapshot);
    if decision.request_signin {
        provider.signin_redirect().await?;
        println!("Redirecting to login... ({})", config.oidc.authority);
    }

    println!("state:  {:?}", decision.state);
    if let Some(name) = snapshot.user.as_ref().and_then(Identity::display_name) {
        println!("user:   {name}");
    }
    let groups = policy.groups(snapshot.user.as_ref());
    if groups.is_empty() {
        println!("groups: (none)");
    } else {
        println!("groups: {}", groups.join(", "));
    }
    println!("required group: {}", policy.required_group);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(groups: &[&str]) -> StaticProvider {
        StaticProvider::new(AuthSnapshot::signed_in(Identity::with_groups(groups.iter().copied())))
    }

    #[tokio::test]
    async fn test_member_is_authorized() {
        let config = AppConfig::default();
        assert!(authorize(&config, &provider(&["/cicd_dev"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_member_is_refused() {
        let config = AppConfig::default();
        let err = authorize(&config, &provider(&["/other"])).await.unwrap_err();
        assert!(err.to_string().contains("/cicd_dev"));
    }

    #[tokio::test]
    async fn test_signed_out_requests_signin() {
        let config = AppConfig::default();
        let provider = load_provider(&config, None).unwrap();
        assert!(authorize(&config, &provider).await.is_err());
        assert_eq!(provider.signin_requests(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_is_surfaced() {
        let config = AppConfig::default();
        let provider = StaticProvider::new(AuthSnapshot::failed("TypeError: Failed to fetch"));
        let err = authorize(&config, &provider).await.unwrap_err();
        assert!(err.to_string().contains("unavailable"));
    }
}
