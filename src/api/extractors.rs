//! Custom request extractors.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use crate::state::AppState;
use crate::utils::client_ip::resolve_client_ip;

/// IP address the current request is attributed to.
///
/// Reads the peer address from [`ConnectInfo`] when the server was started
/// with connect info, and trusts proxy headers only when
/// [`AppState::behind_proxy`] is set. Never rejects.
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    /// `None` when neither a peer address nor a trusted header was available.
    pub fn known(self) -> Option<IpAddr> {
        (!self.0.is_unspecified()).then_some(self.0)
    }
}

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(ClientIp(resolve_client_ip(
            &parts.headers,
            peer,
            state.behind_proxy,
        )))
    }
}
