/// Pixel coordinates of a line between two points, both ends included.
pub fn bresenham_line(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<(i32, i32)> {
    let mut points: Vec<(i32, i32)> = Vec::new();

    let dx: i32 = (x2 - x1).abs();
    let dy: i32 = (y2 - y1).abs();

    let xs: i32 = if x1 < x2 { 1 } else { -1 };
    let ys: i32 = if y1 < y2 { 1 } else { -1 };

    let mut x: i32 = x1;
    let mut y: i32 = y1;

    if dx >= dy {
        let mut p: i32 = 2 * dy - dx;

        while x != x2 {
            points.push((x, y));
            if p >= 0 {
                y += ys;
                p -= 2 * dx;
            }
            p += 2 * dy;
            x += xs;
        }
    } else {
        let mut p: i32 = 2 * dx - dy;

        while y != y2 {
            points.push((x, y));
            if p >= 0 {
                x += xs;
                p -= 2 * dy;
            }
            p += 2 * dx;
            y += ys;
        }
    }

    points.push((x2, y2));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_and_vertical() {
        assert_eq!(bresenham_line(0, 0, 3, 0), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(bresenham_line(2, 2, 2, 0), vec![(2, 2), (2, 1), (2, 0)]);
    }

    #[test]
    fn test_single_point() {
        assert_eq!(bresenham_line(5, 5, 5, 5), vec![(5, 5)]);
    }

    #[test]
    fn test_steep_line_is_connected() {
        let line = bresenham_line(0, 0, 3, -7);
        assert_eq!(line.first(), Some(&(0, 0)));
        assert_eq!(line.last(), Some(&(3, -7)));
        assert_eq!(line.len(), 8);
        for pair in line.windows(2) {
            assert!((pair[0].0 - pair[1].0).abs() <= 1);
            assert_eq!((pair[0].1 - pair[1].1).abs(), 1);
        }
    }
}
