pub mod coalgebra;
pub mod page;
pub mod lru;

pub use coalgebra::PageCacheCoalgebra;
pub use page::{Page, PageData, PageType};
pub use lru::LruCache;

use crate::error::{SqlError, SqlResult};
use crate::types::PageId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Page cache transition types for coalgebraic state machine
#[derive(Debug, Clone)]
pub enum PageCacheTransition {
    Load(PageId),
    Store(PageId, PageData),
    Flush(PageId),
    Evict(PageId),
    FlushAll,
    Clear,
}

/// Page cache statistics
#[derive(Debug, Clone)]
pub struct PageCacheStats {
    pub total_pages: usize,
    pub dirty_pages: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub evictions: u64,
    pub flushes: u64,
}

impl PageCacheStats {
    pub fn new() -> Self {
        PageCacheStats {
            total_pages: 0,
            dirty_pages: 0,
            cache_hits: 0,
            cache_misses: 0,
            evictions: 0,
            flushes: 0,
        }
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

/// Page cache configuration
#[derive(Debug, Clone)]
pub struct PageCacheConfig {
    pub capacity: usize,
    pub page_size: usize,
    pub enable_write_through: bool,
    pub enable_prefetch: bool,
    pub max_dirty_pages: usize,
}

impl Default for PageCacheConfig {
    fn default() -> Self {
        PageCacheConfig {
            capacity: 1000,
            page_size: 4096,
            enable_write_through: false,
            enable_prefetch: true,
            max_dirty_pages: 100,
        }
    }
}

/// Main page cache interface
#[derive(Debug)]
pub struct PageCache {
    coalgebra: Arc<Mutex<PageCacheCoalgebra>>,
    config: PageCacheConfig,
    stats: Arc<Mutex<PageCacheStats>>,
}

impl PageCache {
    pub fn new(config: PageCacheConfig) -> Self {
        PageCache {
            coalgebra: Arc::new(Mutex::new(PageCacheCoalgebra::new(config.capacity))),
            config,
            stats: Arc::new(Mutex::new(PageCacheStats::new())),
        }
    }

    /// Load a page from cache or storage
    pub async fn load_page(&self, page_id: PageId) -> SqlResult<Arc<PageData>> {
        let mut coalgebra = self.coalgebra.lock().unwrap();
        let mut stats = self.stats.lock().unwrap();

        match coalgebra.process_input(PageCacheTransition::Load(page_id)) {
            (Some(page_data), _) => {
                stats.cache_hits += 1;
                Ok(page_data)
            }
            (None, _) => {
                stats.cache_misses += 1;
                // Load from storage (simulated)
                let page_data = self.load_from_storage(page_id).await?;
                let arc_data = Arc::new(page_data.clone());
                
                // Store in cache
                coalgebra.process_input(PageCacheTransition::Store(page_id, page_data));
                stats.total_pages += 1;
                
                Ok(arc_data)
            }
        }
    }

    /// Store a page in cache
    pub async fn store_page(&self, page_id: PageId, page_data: PageData) -> SqlResult<()> {
        let mut coalgebra = self.coalgebra.lock().unwrap();
        let mut stats = self.stats.lock().unwrap();

        coalgebra.process_input(PageCacheTransition::Store(page_id, page_data.clone()));
        
        if page_data.is_dirty {
            stats.dirty_pages += 1;
        }

        // Write through if enabled
        if self.config.enable_write_through {
            self.write_to_storage(page_id, &page_data).await?;
        }

        Ok(())
    }

    /// Flush a specific page to storage
    pub async fn flush_page(&self, page_id: PageId) -> SqlResult<()> {
        let mut coalgebra = self.coalgebra.lock().unwrap();
        let mut stats = self.stats.lock().unwrap();

        if let (Some(page_data), _) = coalgebra.process_input(PageCacheTransition::Load(page_id)) {
            if page_data.is_dirty {
                self.write_to_storage(page_id, &page_data).await?;
                
                // Mark as clean
                let clean_data = PageData {
                    data: page_data.data.clone(),
                    is_dirty: false,
                    page_type: page_data.page_type,
                    checksum: page_data.checksum,
                };
                
                coalgebra.process_input(PageCacheTransition::Store(page_id, clean_data));
                stats.dirty_pages = stats.dirty_pages.saturating_sub(1);
                stats.flushes += 1;
            }
        }

        Ok(())
    }

    /// Flush all dirty pages to storage
    pub async fn flush_all(&self) -> SqlResult<()> {
        let mut coalgebra = self.coalgebra.lock().unwrap();
        let mut stats = self.stats.lock().unwrap();

        coalgebra.process_input(PageCacheTransition::FlushAll);
        
        // In a real implementation, this would iterate through all dirty pages
        stats.dirty_pages = 0;
        stats.flushes += 1;

        Ok(())
    }

    /// Evict a page from cache
    pub async fn evict_page(&self, page_id: PageId) -> SqlResult<()> {
        let mut coalgebra = self.coalgebra.lock().unwrap();
        let mut stats = self.stats.lock().unwrap();

        // Flush if dirty before evicting
        if let (Some(page_data), _) = coalgebra.process_input(PageCacheTransition::Load(page_id)) {
            if page_data.is_dirty {
                self.write_to_storage(page_id, &page_data).await?;
            }
        }

        coalgebra.process_input(PageCacheTransition::Evict(page_id));
        stats.evictions += 1;
        stats.total_pages = stats.total_pages.saturating_sub(1);

        Ok(())
    }

    /// Clear entire cache
    pub async fn clear(&self) -> SqlResult<()> {
        // Flush all dirty pages first
        self.flush_all().await?;

        let mut coalgebra = self.coalgebra.lock().unwrap();
        let mut stats = self.stats.lock().unwrap();

        coalgebra.process_input(PageCacheTransition::Clear);
        *stats = PageCacheStats::new();

        Ok(())
    }

    /// Get cache statistics
    pub fn get_stats(&self) -> PageCacheStats {
        let stats = self.stats.lock().unwrap();
        stats.clone()
    }

    /// Get cache configuration
    pub fn get_config(&self) -> &PageCacheConfig {
        &self.config
    }

    /// Check if cache needs maintenance (too many dirty pages)
    pub fn needs_maintenance(&self) -> bool {
        let stats = self.stats.lock().unwrap();
        stats.dirty_pages > self.config.max_dirty_pages
    }

    /// Perform cache maintenance
    pub async fn perform_maintenance(&self) -> SqlResult<()> {
        if self.needs_maintenance() {
            self.flush_all().await?;
        }
        Ok(())
    }

    /// Prefetch pages (if enabled)
    pub async fn prefetch_pages(&self, page_ids: Vec<PageId>) -> SqlResult<()> {
        if !self.config.enable_prefetch {
            return Ok(());
        }

        for page_id in page_ids {
            // Check if already in cache
            let mut coalgebra = self.coalgebra.lock().unwrap();
            if let (None, _) = coalgebra.process_input(PageCacheTransition::Load(page_id)) {
                drop(coalgebra);
                // Not in cache, load it
                self.load_page(page_id).await?;
            }
        }

        Ok(())
    }

    // Private helper methods
    async fn load_from_storage(&self, page_id: PageId) -> SqlResult<PageData> {
        // Simulate loading from storage
        // In a real implementation, this would read from disk
        Ok(PageData::new(
            vec![0; self.config.page_size],
            PageType::Data,
        ))
    }

    async fn write_to_storage(&self, page_id: PageId, page_data: &PageData) -> SqlResult<()> {
        // Simulate writing to storage
        // In a real implementation, this would write to disk
        Ok(())
    }
}

impl Clone for PageCache {
    fn clone(&self) -> Self {
        PageCache {
            coalgebra: Arc::clone(&self.coalgebra),
            config: self.config.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_page_cache_basic_operations() {
        let config = PageCacheConfig::default();
        let cache = PageCache::new(config);
        
        let page_id = PageId(1);
        let page_data = PageData::new(vec![1, 2, 3, 4], PageType::Data);
        
        // Store page
        cache.store_page(page_id, page_data.clone()).await.unwrap();
        
        // Load page
        let loaded = cache.load_page(page_id).await.unwrap();
        assert_eq!(loaded.data, page_data.data);
        
        // Check stats
        let stats = cache.get_stats();
        assert_eq!(stats.cache_hits, 1);
    }

    #[tokio::test]
    async fn test_page_cache_flush() {
        let config = PageCacheConfig::default();
        let cache = PageCache::new(config);
        
        let page_id = PageId(1);
        let mut page_data = PageData::new(vec![1, 2, 3, 4], PageType::Data);
        page_data.is_dirty = true;
        
        cache.store_page(page_id, page_data).await.unwrap();
        cache.flush_page(page_id).await.unwrap();
        
        let stats = cache.get_stats();
        assert_eq!(stats.flushes, 1);
    }
}
