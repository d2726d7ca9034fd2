use super::catalog::{ConfigValidationError, TaxCatalog};
use super::config::CountryTaxDocument;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Handle to the current [`TaxCatalog`] for hosts that reload tax data.
///
/// Readers take a snapshot and keep using it for as long as they like; a
/// reload builds and validates a complete new catalog, then publishes it with
/// a single pointer swap.
pub struct SharedCatalog {
    current: ArcSwap<TaxCatalog>,
}

impl SharedCatalog {
    pub fn new(catalog: TaxCatalog) -> Self {
        SharedCatalog {
            current: ArcSwap::from_pointee(catalog),
        }
    }

    /// The catalog as of now
    pub fn snapshot(&self) -> Arc<TaxCatalog> {
        self.current.load_full()
    }

    /// Validate `documents` and publish them as the new catalog.
    ///
    /// On error the current catalog is left untouched.
    pub fn reload<I>(&self, documents: I) -> Result<Arc<TaxCatalog>, ConfigValidationError>
    where
        I: IntoIterator<Item = (String, CountryTaxDocument)>,
    {
        let catalog = match TaxCatalog::load(documents) {
            Ok(catalog) => Arc::new(catalog),
            Err(err) => {
                log::warn!("Tax catalog reload rejected: {}", err);
                return Err(err);
            }
        };
        self.current.store(Arc::clone(&catalog));
        log::info!("Tax catalog reloaded: {} countries", catalog.len());
        Ok(catalog)
    }
}

impl From<TaxCatalog> for SharedCatalog {
    fn from(catalog: TaxCatalog) -> Self {
        SharedCatalog::new(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::catalog::tests::{document, keyed};
    use crate::tax::TaxType;

    #[test]
    fn reload_publishes_new_catalog() {
        let shared = SharedCatalog::new(TaxCatalog::load(keyed(vec![document("NL")])).unwrap());
        let before = shared.snapshot();

        shared
            .reload(keyed(vec![document("NL"), document("BE")]))
            .unwrap();

        // Earlier snapshots are unaffected
        assert_eq!(before.supported_countries(), vec!["NL"]);
        assert_eq!(shared.snapshot().supported_countries(), vec!["BE", "NL"]);
    }

    #[test]
    fn failed_reload_keeps_current_catalog() {
        let shared: SharedCatalog = TaxCatalog::load(keyed(vec![document("NL")])).unwrap().into();

        let mut broken = document("BE");
        broken.income_taxes.clear();
        assert!(shared.reload(keyed(vec![document("DE"), broken])).is_err());

        let current = shared.snapshot();
        assert_eq!(current.supported_countries(), vec!["NL"]);
        assert!(current.default_option("NL", TaxType::Income).is_some());
    }

    #[test]
    fn snapshots_cross_threads() {
        let shared = Arc::new(SharedCatalog::new(
            TaxCatalog::load(keyed(vec![document("NL")])).unwrap(),
        ));
        let reader = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || shared.snapshot().len())
        };
        shared.reload(keyed(vec![document("BE"), document("DE")])).unwrap();
        let seen = reader.join().unwrap();
        assert!(seen == 1 || seen == 2);
    }
}
