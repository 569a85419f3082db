//! Brute-force credential search over (version × community).
//!
//! Versions are the outer loop and communities the inner one, so every
//! community is tried at v2c before any v1 attempt. sysName gates each
//! candidate: if it does not answer, the remaining three objects are never
//! requested. The first candidate that answers sysName wins and the search
//! stops.

use std::net::Ipv4Addr;
use std::sync::Arc;

use sweep_core::types::{Credential, Discovery, Identity, IdentityField, SnmpVersion};

use crate::snmp::{fetch_field, SnmpConnector};

#[derive(Clone)]
pub struct CredentialSearcher {
    connector: Arc<dyn SnmpConnector>,
    communities: Arc<[String]>,
}

impl CredentialSearcher {
    /// `communities` is in priority order: most likely first.
    pub fn new(connector: Arc<dyn SnmpConnector>, communities: Vec<String>) -> Self {
        Self {
            connector,
            communities: communities.into(),
        }
    }

    pub fn communities(&self) -> &[String] {
        &self.communities
    }

    /// Candidates in the order they are tried.
    pub fn candidates(&self) -> impl Iterator<Item = Credential> + '_ {
        SnmpVersion::SEARCH_ORDER.into_iter().flat_map(move |version| {
            self.communities
                .iter()
                .map(move |community| Credential::new(version, community.as_str()))
        })
    }

    /// Find the first working credential for `addr` and read its identity.
    ///
    /// Returns `None` when no candidate answers sysName.
    pub async fn search(&self, addr: Ipv4Addr) -> Option<Discovery> {
        for credential in self.candidates() {
            let mut session = match self.connector.open(addr, &credential).await {
                Ok(session) => session,
                Err(e) => {
                    tracing::debug!(
                        address = %addr,
                        credential = %credential,
                        error = %e,
                        "Session open failed"
                    );
                    continue;
                }
            };

            let Some(sys_name) = fetch_field(session.as_mut(), IdentityField::SysName).await else {
                tracing::debug!(
                    address = %addr,
                    credential = %credential,
                    "No sysName, next candidate"
                );
                continue;
            };

            let mut identity = Identity::new(sys_name);
            for field in IdentityField::SECONDARY {
                let value = fetch_field(session.as_mut(), field).await;
                identity.set(field, value);
            }

            tracing::info!(
                address = %addr,
                version = %credential.version,
                community = %credential.community,
                sys_name = %identity.sys_name,
                "Working credential found"
            );
            return Some(Discovery {
                credential,
                identity,
            });
        }

        tracing::debug!(
            address = %addr,
            tried = self.communities.len() * SnmpVersion::SEARCH_ORDER.len(),
            "Credential search exhausted"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::SnmpError;
    use crate::snmp::IdentitySession;

    type Log = Arc<Mutex<Vec<(Credential, IdentityField)>>>;

    /// Answers every object for one credential; silent for the rest.
    struct OneKey {
        accept: Credential,
        log: Log,
    }

    struct KeySession {
        credential: Credential,
        accepted: bool,
        log: Log,
    }

    #[async_trait]
    impl IdentitySession for KeySession {
        async fn get(&mut self, field: IdentityField) -> Result<String, SnmpError> {
            self.log.lock().unwrap().push((self.credential.clone(), field));
            if self.accepted {
                Ok(format!("{field}-value"))
            } else {
                Err(SnmpError::Timeout { timeout_ms: 1 })
            }
        }
    }

    #[async_trait]
    impl SnmpConnector for OneKey {
        async fn open(
            &self,
            _addr: Ipv4Addr,
            credential: &Credential,
        ) -> Result<Box<dyn IdentitySession>, SnmpError> {
            Ok(Box::new(KeySession {
                credential: credential.clone(),
                accepted: *credential == self.accept,
                log: self.log.clone(),
            }))
        }
    }

    fn searcher(accept: Credential, communities: &[&str]) -> (CredentialSearcher, Log) {
        let log: Log = Arc::default();
        let connector = Arc::new(OneKey {
            accept,
            log: log.clone(),
        });
        let communities = communities.iter().map(|c| c.to_string()).collect();
        (CredentialSearcher::new(connector, communities), log)
    }

    #[test]
    fn test_candidates_exhaust_v2c_before_v1() {
        let (s, _) = searcher(
            Credential::new(SnmpVersion::V1, "x"),
            &["public", "private"],
        );
        let order: Vec<String> = s.candidates().map(|c| c.to_string()).collect();
        assert_eq!(
            order,
            vec!["v2c/public", "v2c/private", "v1/public", "v1/private"]
        );
    }

    #[tokio::test]
    async fn test_bad_guess_costs_one_request() {
        let (s, log) = searcher(
            Credential::new(SnmpVersion::V2c, "private"),
            &["public", "private"],
        );
        let found = s.search(Ipv4Addr::new(10, 0, 0, 1)).await.unwrap();
        assert_eq!(
            found.credential,
            Credential::new(SnmpVersion::V2c, "private")
        );

        let log = log.lock().unwrap();
        let public: Vec<_> = log
            .iter()
            .filter(|(c, _)| c.community == "public")
            .collect();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].1, IdentityField::SysName);
        assert!(log.iter().all(|(c, _)| c.version == SnmpVersion::V2c));
    }

    #[tokio::test]
    async fn test_winner_fetches_each_field_once() {
        let (s, log) = searcher(Credential::new(SnmpVersion::V1, "public"), &["public"]);
        let found = s.search(Ipv4Addr::new(10, 0, 0, 1)).await.unwrap();

        assert_eq!(found.identity.sys_name, "sysName-value");
        assert_eq!(
            found.identity.sys_location.as_deref(),
            Some("sysLocation-value")
        );
        assert_eq!(
            found.identity.sys_contact.as_deref(),
            Some("sysContact-value")
        );
        assert_eq!(
            found.identity.sys_uptime.as_deref(),
            Some("sysUpTime-value")
        );

        let winner: Vec<IdentityField> = log
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c.version == SnmpVersion::V1)
            .map(|(_, f)| *f)
            .collect();
        assert_eq!(
            winner,
            vec![
                IdentityField::SysName,
                IdentityField::SysLocation,
                IdentityField::SysContact,
                IdentityField::SysUpTime,
            ]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_returns_none() {
        let (s, log) = searcher(
            Credential::new(SnmpVersion::V1, "secret"),
            &["public", "private"],
        );
        assert!(s.search(Ipv4Addr::new(10, 0, 0, 1)).await.is_none());
        // Four candidates, sysName only.
        assert_eq!(log.lock().unwrap().len(), 4);
    }
}
