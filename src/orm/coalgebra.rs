/// Coalgebraic structures for the ORM
/// 
/// This module defines coalgebraic foundations:
/// - Coalgebra trait for F-coalgebras
/// - Anamorphism for unfolding structures
/// - Final coalgebras for infinite data structures
/// - Coalgebraic operations over database streams

// Removed PhantomData import as it's no longer needed

/// F-Coalgebra trait
/// An F-coalgebra is a structure (A, α) where:
/// - A is the carrier type (state space)
/// - α: A → F(A) is the coalgebra morphism (observation function)
pub trait Coalgebra<F> {
    type Carrier;
    
    /// The coalgebra morphism α: A → F(A)
    fn coalgebra(carrier: Self::Carrier) -> F;
}

/// Anamorphism - unfold operation for building structures
/// Given an F-coalgebra (A, α), ana(α) : A → νF
pub trait Anamorphism<F, A> {
    /// Unfold the structure using the given coalgebra
    fn ana<Coalg: Coalgebra<F, Carrier = A>>(seed: A) -> Self;
}

/// Simplified stream for database results
/// This is a basic implementation without complex coalgebraic structures
#[derive(Debug, Clone)]
pub struct Stream<T> {
    items: Vec<T>,
    position: usize,
}

impl<T> Stream<T> {
    /// Create a new stream from a vector
    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items, position: 0 }
    }

    /// Create an empty stream
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Get the next element from the stream
    pub fn next(&mut self) -> Option<T> {
        if self.position < self.items.len() {
            let item = self.items.remove(0);
            Some(item)
        } else {
            None
        }
    }

    /// Check if the stream is empty
    pub fn is_empty(&self) -> bool {
        self.position >= self.items.len()
    }

    /// Map over the stream elements
    pub fn map<U, F>(self, f: F) -> Stream<U>
    where
        F: Fn(T) -> U,
    {
        let mapped_items = self.items.into_iter().map(f).collect();
        Stream::from_vec(mapped_items)
    }

    /// Filter stream elements
    pub fn filter<F>(self, predicate: F) -> Stream<T>
    where
        F: Fn(&T) -> bool,
    {
        let filtered_items = self.items.into_iter().filter(predicate).collect();
        Stream::from_vec(filtered_items)
    }

    /// Take the first n elements
    pub fn take(self, n: usize) -> Stream<T> {
        let taken_items = self.items.into_iter().take(n).collect();
        Stream::from_vec(taken_items)
    }

    /// Collect all elements into a vector
    pub fn collect(self) -> Vec<T> {
        self.items
    }
}

// Removed complex stream state implementations for simplicity

/// Database result stream - coalgebraic representation of query results
pub struct ResultStream<T> {
    stream: Stream<T>,
}

impl<T> ResultStream<T> {
    /// Create a new result stream
    pub fn new(stream: Stream<T>) -> Self {
        Self { stream }
    }
    
    /// Create an empty result stream
    pub fn empty() -> Self {
        Self::new(Stream::empty())
    }
    
    /// Create a result stream from a vector
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::new(Stream::from_vec(items))
    }
    
    /// Get the next result
    pub fn next(&mut self) -> Option<T> {
        self.stream.next()
    }
    
    /// Map over the results
    pub fn map<U, F>(self, f: F) -> ResultStream<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        T: 'static,
        U: 'static,
    {
        ResultStream::new(self.stream.map(f))
    }
    
    /// Filter results
    pub fn filter<F>(self, predicate: F) -> ResultStream<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
        T: 'static,
    {
        ResultStream::new(self.stream.filter(predicate))
    }
    
    /// Take the first n results
    pub fn take(self, n: usize) -> ResultStream<T>
    where
        T: 'static,
    {
        ResultStream::new(self.stream.take(n))
    }
    
    /// Collect all results
    pub fn collect(self) -> Vec<T> {
        self.stream.collect()
    }
}

/// Cursor coalgebra for database iteration
/// This represents a cursor that can move through database results
pub struct Cursor<T> {
    position: usize,
    data: Vec<T>,
}

impl<T> Cursor<T> {
    /// Create a new cursor
    pub fn new(data: Vec<T>) -> Self {
        Self { position: 0, data }
    }
    
    /// Move to the next position
    pub fn next(&mut self) -> Option<&T> {
        if self.position < self.data.len() {
            let item = &self.data[self.position];
            self.position += 1;
            Some(item)
        } else {
            None
        }
    }
    
    /// Move to the previous position
    pub fn prev(&mut self) -> Option<&T> {
        if self.position > 0 {
            self.position -= 1;
            Some(&self.data[self.position])
        } else {
            None
        }
    }
    
    /// Get the current item without moving
    pub fn current(&self) -> Option<&T> {
        self.data.get(self.position)
    }
    
    /// Reset to the beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }
    
    /// Check if at the end
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }
    
    /// Get the current position
    pub fn position(&self) -> usize {
        self.position
    }
    
    /// Get the total length
    pub fn len(&self) -> usize {
        self.data.len()
    }
    
    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stream() {
        let mut stream = Stream::<i32>::empty();
        assert!(stream.is_empty());
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_vec_stream() {
        let mut stream = Stream::from_vec(vec![1, 2, 3]);
        assert!(!stream.is_empty());
        
        assert_eq!(stream.next(), Some(1));
        assert_eq!(stream.next(), Some(2));
        assert_eq!(stream.next(), Some(3));
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_stream_map() {
        let stream = Stream::from_vec(vec![1, 2, 3]);
        let mapped = stream.map(|x| x * 2);
        let result = mapped.collect();
        
        assert_eq!(result, vec![2, 4, 6]);
    }

    #[test]
    fn test_stream_filter() {
        let stream = Stream::from_vec(vec![1, 2, 3, 4, 5]);
        let filtered = stream.filter(|&x| x % 2 == 0);
        let result = filtered.collect();
        
        assert_eq!(result, vec![2, 4]);
    }

    #[test]
    fn test_stream_take() {
        let stream = Stream::from_vec(vec![1, 2, 3, 4, 5]);
        let taken = stream.take(3);
        let result = taken.collect();
        
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn test_result_stream() {
        let mut result_stream = ResultStream::from_vec(vec!["a", "b", "c"]);
        
        assert_eq!(result_stream.next(), Some("a"));
        assert_eq!(result_stream.next(), Some("b"));
        assert_eq!(result_stream.next(), Some("c"));
        assert_eq!(result_stream.next(), None);
    }

    #[test]
    fn test_cursor() {
        let mut cursor = Cursor::new(vec![10, 20, 30]);
        
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.current(), Some(&10));
        
        assert_eq!(cursor.next(), Some(&10));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.current(), Some(&20));
        
        assert_eq!(cursor.next(), Some(&20));
        assert_eq!(cursor.next(), Some(&30));
        assert_eq!(cursor.next(), None);
        assert!(cursor.is_at_end());
        
        assert_eq!(cursor.prev(), Some(&30));
        assert_eq!(cursor.position(), 2);
        
        cursor.reset();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.current(), Some(&10));
    }
}
