//! Interception CA generation.

use std::fs;

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    KeyUsagePurpose,
};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::ca::CaRecord;
use crate::config::Configuration;
use crate::errors::CaError;
use crate::{utils, APP_NAME};

/// Produces fresh CA material. Called by the lifecycle manager only while it
/// holds its lock, so implementations need no synchronisation of their own.
pub trait CaGenerator: Send + Sync {
    fn init_ca(&self, config: &Configuration, version: &str) -> Result<CaRecord, CaError>;
}

impl<F> CaGenerator for F
where
    F: Fn(&Configuration, &str) -> Result<CaRecord, CaError> + Send + Sync,
{
    fn init_ca(&self, config: &Configuration, version: &str) -> Result<CaRecord, CaError> {
        self(config, version)
    }
}

/// Self-signed ECDSA P-256 CA written into the per-process temp directory.
#[derive(Debug, Clone)]
pub struct RcgenCaGenerator {
    common_name: String,
}

impl Default for RcgenCaGenerator {
    fn default() -> Self {
        Self { common_name: format!("{} Intercept CA", APP_NAME) }
    }
}

impl RcgenCaGenerator {
    fn params(&self, valid_for: Duration) -> CertificateParams {
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, self.common_name.as_str());
        dn.push(DnType::OrganizationName, APP_NAME);

        let mut params = CertificateParams::default();
        params.distinguished_name = dn;
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];

        // Small buffer for clock skew
        let now = OffsetDateTime::now_utc();
        params.not_before = now - Duration::minutes(5);
        params.not_after = now + valid_for;
        params
    }
}

impl CaGenerator for RcgenCaGenerator {
    fn init_ca(&self, config: &Configuration, version: &str) -> Result<CaRecord, CaError> {
        let valid_for = config.ca_validity().map_err(|e| CaError::Config(e.to_string()))?;

        let directory = utils::temporary_directory(&config.cache_path(), version);
        fs::create_dir_all(&directory)
            .map_err(|source| CaError::CreateDirectory { path: directory.clone(), source })?;

        let key_pair = KeyPair::generate()?;
        let certificate = self.params(valid_for).self_signed(&key_pair)?;
        let cert_pem = certificate.pem();

        let cert_file_path = directory.join(format!("intercept-ca-{}.crt", Uuid::new_v4()));
        utils::write_to_file(&cert_file_path, cert_pem.as_bytes()).map_err(|source| {
            CaError::WriteCertificate { path: cert_file_path.clone(), source }
        })?;

        debug!(path = %cert_file_path.display(), "generated interception CA certificate");

        Ok(CaRecord::new(cert_file_path, cert_pem.into_bytes())
            .with_private_key(key_pair.serialize_pem()))
    }
}
